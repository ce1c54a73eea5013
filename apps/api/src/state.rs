use std::sync::Arc;

use crate::config::Config;
use crate::interview::orchestrator::InterviewOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the session store and the text-generation client.
    pub orchestrator: Arc<InterviewOrchestrator>,
    pub config: Config,
}
