use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::interview::orchestrator::InterviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid session")]
    InvalidSession,

    #[error("parse failure")]
    ParseFailure { raw: String },

    #[error("interview already complete")]
    AlreadyComplete,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

impl From<InterviewError> for AppError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::InvalidSession(_) => AppError::InvalidSession,
            InterviewError::ParseFailure { raw } => AppError::ParseFailure { raw },
            InterviewError::AlreadyComplete(_) => AppError::AlreadyComplete,
            InterviewError::Validation(msg) => AppError::Validation(msg),
            err @ InterviewError::Collaborator { .. } => AppError::Llm(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidSession => (
                StatusCode::NOT_FOUND,
                "INVALID_SESSION",
                "invalid session".to_string(),
            ),
            AppError::ParseFailure { raw } => {
                let body = Json(json!({
                    "error": {
                        "code": "PARSE_FAILURE",
                        "message": "parse failure",
                        "raw": raw
                    }
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::AlreadyComplete => (
                StatusCode::CONFLICT,
                "ALREADY_COMPLETE",
                "interview already complete".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The text generation service failed; please retry".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::orchestrator::CallStage;
    use crate::llm_client::LlmError;
    use uuid::Uuid;

    #[test]
    fn test_interview_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(InterviewError::InvalidSession(Uuid::new_v4())),
            AppError::InvalidSession
        ));
        assert!(matches!(
            AppError::from(InterviewError::ParseFailure { raw: "x".into() }),
            AppError::ParseFailure { raw } if raw == "x"
        ));
        let llm = AppError::from(InterviewError::Collaborator {
            stage: CallStage::Evaluation,
            source: LlmError::EmptyContent,
        });
        match llm {
            AppError::Llm(msg) => assert!(msg.starts_with("answer evaluation failed")),
            other => panic!("expected Llm, got {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidSession.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ParseFailure { raw: String::new() }
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::AlreadyComplete.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Llm("down".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
