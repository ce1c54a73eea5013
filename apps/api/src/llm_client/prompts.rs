// Shared prompt fragments.
// Each feature module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Appended to every prompt whose answer is machine-parsed.
/// The model does not always comply; callers must still parse tolerantly.
pub const JSON_ONLY_RULES: &str = "Rules:
- Return ONLY valid JSON.
- Do not include markdown/code fences.
- Do not include any text before or after JSON.";

/// Keeps generated questions self-contained so they can be shown verbatim.
pub const SINGLE_QUESTION_RULES: &str = "Ask exactly one question. \
    Do not include the answer, hints, or any preamble.";
