//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    Json,
};

use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{
    SessionId, SessionSummary, SessionTranscript, StartInterviewRequest,
    StartInterviewResponse, SubmitAnswerRequest, SubmitAnswerResponse,
};
use crate::state::AppState;

/// POST /api/v1/interviews
///
/// Opens a session and returns the first question.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, AppError> {
    let response = state.orchestrator.start(request).await?;
    Ok(Json(response))
}

/// POST /api/v1/interviews/answer
///
/// Evaluates an answer to the current question. Returns either the next
/// question or, on the last round, the final report.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    let response = state
        .orchestrator
        .submit_answer(parse_session_id(&request.session_id)?, &request.answer)
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/interviews/:session_id/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    Ok(Json(state.orchestrator.summary(session_id).await?))
}

/// GET /api/v1/interviews/:session_id
///
/// Full session snapshot including every question, answer and evaluation.
pub async fn handle_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionTranscript>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    Ok(Json(state.orchestrator.transcript(session_id).await?))
}

/// Ids are opaque to clients: anything that is not one of ours is unknown.
fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidSession)
}
