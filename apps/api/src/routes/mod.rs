pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interviews", post(handlers::handle_start))
        .route(
            "/api/v1/interviews/answer",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/interviews/:session_id",
            get(handlers::handle_transcript),
        )
        .route(
            "/api/v1/interviews/:session_id/summary",
            get(handlers::handle_summary),
        )
        .with_state(state)
}
