// Adaptive interview sessions.
// Implements: answer evaluation normalization, difficulty control, session store, orchestration.
// All LLM calls go through llm_client::TextGenerator; no direct HTTP calls here.

pub mod difficulty;
pub mod feedback;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod store;
