// All LLM prompt templates for the interview flow.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::interview::models::{Session, SessionInit, Turn};
use crate::llm_client::prompts::{JSON_ONLY_RULES, SINGLE_QUESTION_RULES};

/// Present in every evaluation prompt and nowhere else.
pub const EVALUATION_MARKER: &str = "You are evaluating a candidate's interview response.";

/// Present in every final-report prompt and nowhere else.
pub const FINAL_REPORT_MARKER: &str = "Generate the final structured report";

/// Question prompt template.
/// Replace: {interview_type}, {field}, {difficulty}, {resume}, {job_description},
///          {previous_questions}, {single_question_rules}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"You are conducting a {interview_type} interview.

Field: {field}
Difficulty Level: {difficulty}/10

Resume:
{resume}

Job Description:
{job_description}

Questions already asked (do not repeat them):
{previous_questions}

Ask a challenging interview question appropriate to the difficulty level.
{single_question_rules}"#;

/// Evaluation prompt template.
/// Replace: {evaluation_marker}, {field}, {interview_type}, {difficulty},
///          {question}, {answer}, {json_only_rules}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"{evaluation_marker}

Field: {field}
Interview Type: {interview_type}
Difficulty: {difficulty}/10

Question:
{question}

Candidate Answer:
{answer}

Return your evaluation STRICTLY in this JSON format:

{
  "score": integer (1-10),
  "communication_score": integer (1-10),
  "technical_score": integer (1-10),
  "confidence_score": integer (1-10),
  "strengths": "string",
  "weaknesses": "string"
}

{json_only_rules}"#;

/// Final report prompt template.
/// Replace: {final_report_marker}, {field}, {interview_type}, {history}, {average_score}
pub const FINAL_REPORT_PROMPT_TEMPLATE: &str = r#"You conducted a full {interview_type} interview.

Field: {field}

Interview History:
{history}

Average Score: {average_score}

{final_report_marker} with these sections:

Overall Summary
Strengths
Weaknesses
Hiring Recommendation"#;

const NONE_PROVIDED: &str = "(none provided)";

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        NONE_PROVIDED
    } else {
        text
    }
}

/// Fills `{name}` placeholders in a single left-to-right pass. Substituted
/// text is never rescanned, so braces in user or model text stay literal.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = tail.find('}').and_then(|close| {
            let key = &tail[1..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Opening question, built from the start request before the session exists.
pub fn build_opening_question_prompt(init: &SessionInit) -> String {
    let difficulty = init.difficulty.to_string();
    render(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("interview_type", init.interview_type.as_str()),
            ("field", init.field.as_str()),
            ("difficulty", difficulty.as_str()),
            ("resume", or_none(&init.resume)),
            ("job_description", or_none(&init.job_description)),
            ("previous_questions", NONE_PROVIDED),
            ("single_question_rules", SINGLE_QUESTION_RULES),
        ],
    )
}

/// Follow-up question for the session's current difficulty.
pub fn build_question_prompt(session: &Session) -> String {
    let previous = session
        .history
        .iter()
        .enumerate()
        .map(|(i, turn)| format!("{}. {}", i + 1, turn.question.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    let difficulty = session.difficulty.to_string();

    render(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("interview_type", session.interview_type.as_str()),
            ("field", session.field.as_str()),
            ("difficulty", difficulty.as_str()),
            ("resume", or_none(&session.resume)),
            ("job_description", or_none(&session.job_description)),
            ("previous_questions", or_none(&previous)),
            ("single_question_rules", SINGLE_QUESTION_RULES),
        ],
    )
}

pub fn build_evaluation_prompt(session: &Session, question: &str, answer: &str) -> String {
    let difficulty = session.difficulty.to_string();
    render(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("evaluation_marker", EVALUATION_MARKER),
            ("field", session.field.as_str()),
            ("interview_type", session.interview_type.as_str()),
            ("difficulty", difficulty.as_str()),
            ("question", question),
            ("answer", answer),
            ("json_only_rules", JSON_ONLY_RULES),
        ],
    )
}

pub fn build_final_report_prompt(session: &Session) -> String {
    let average_score = format!("{:.2}", session.average_score);
    let history = render_history(&session.history);
    render(
        FINAL_REPORT_PROMPT_TEMPLATE,
        &[
            ("final_report_marker", FINAL_REPORT_MARKER),
            ("field", session.field.as_str()),
            ("interview_type", session.interview_type.as_str()),
            ("average_score", average_score.as_str()),
            ("history", history.as_str()),
        ],
    )
}

fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            let e = &turn.evaluation;
            format!(
                "Round {round}\nQuestion: {q}\nAnswer: {a}\nScore: {s}/10 \
                 (communication {c}, technical {t}, confidence {f})\n\
                 Strengths: {st}\nWeaknesses: {w}",
                round = i + 1,
                q = turn.question.trim(),
                a = turn.answer.trim(),
                s = e.score,
                c = e.communication_score,
                t = e.technical_score,
                f = e.confidence_score,
                st = e.strengths,
                w = e.weaknesses,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
