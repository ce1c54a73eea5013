//! Interview Orchestrator: drives a session from first question to final report.
//!
//! Flow per answer: evaluation prompt → collaborator → normalize → difficulty
//! step → next question or final report → commit.
//!
//! Every collaborator call for a submission happens on a working copy of the
//! session. The stored record changes only once all of them have succeeded,
//! so any failure (parse, transport, timeout) leaves the session exactly as
//! it was and the same answer can be resubmitted.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::interview::difficulty::next_difficulty;
use crate::interview::feedback::{normalize, ParseFailure};
use crate::interview::models::{
    RoundOutcome, Session, SessionId, SessionInit, SessionSummary, SessionTranscript,
    StartInterviewRequest, StartInterviewResponse, SubmitAnswerResponse, Turn, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};
use crate::interview::prompts::{
    build_evaluation_prompt, build_final_report_prompt, build_opening_question_prompt,
    build_question_prompt,
};
use crate::interview::store::{SessionStore, StoreError};
use crate::llm_client::{LlmError, TextGenerator};

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Which collaborator call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    Question,
    Evaluation,
    FinalReport,
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CallStage::Question => "question generation",
            CallStage::Evaluation => "answer evaluation",
            CallStage::FinalReport => "final report generation",
        })
    }
}

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("invalid session")]
    InvalidSession(SessionId),

    #[error("evaluation could not be parsed")]
    ParseFailure { raw: String },

    #[error("interview already complete")]
    AlreadyComplete(SessionId),

    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: CallStage,
        #[source]
        source: LlmError,
    },

    #[error("{0}")]
    Validation(String),
}

impl From<StoreError> for InterviewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => InterviewError::InvalidSession(id),
        }
    }
}

impl From<ParseFailure> for InterviewError {
    fn from(err: ParseFailure) -> Self {
        InterviewError::ParseFailure { raw: err.raw }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-session serialization
// ────────────────────────────────────────────────────────────────────────────

/// One async mutex per session id; held for the whole of a submission.
#[derive(Default)]
struct SessionLocks {
    inner: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, id: SessionId) -> OwnedMutexGuard<()> {
        let lock = self.inner.lock().await.entry(id).or_default().clone();
        lock.lock_owned().await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Bound on each collaborator call; expiry counts as a collaborator failure.
    pub llm_timeout: Duration,
    pub max_total_rounds: u32,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            llm_timeout: Duration::from_secs(60),
            max_total_rounds: 20,
        }
    }
}

pub struct InterviewOrchestrator {
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn TextGenerator>,
    locks: SessionLocks,
    settings: OrchestratorSettings,
}

impl InterviewOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn TextGenerator>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            llm,
            locks: SessionLocks::default(),
            settings,
        }
    }

    /// Opens a session and returns its first question.
    ///
    /// The question is generated before the session is registered, so a failed
    /// collaborator call never leaves a question-less session behind.
    pub async fn start(
        &self,
        request: StartInterviewRequest,
    ) -> Result<StartInterviewResponse, InterviewError> {
        self.validate_start(&request)?;

        let mut init = SessionInit {
            field: request.field.trim().to_string(),
            interview_type: request.interview_type.trim().to_string(),
            difficulty: request.difficulty,
            total_rounds: request.total_rounds,
            resume: request.resume,
            job_description: request.job_description,
            opening_question: String::new(),
        };

        let question = self
            .generate(CallStage::Question, &build_opening_question_prompt(&init))
            .await?;
        init.opening_question = question.clone();

        let session_id = self.store.create(init).await?;
        info!(
            "Interview {session_id} started: field={:?} type={:?} difficulty={} rounds={}",
            request.field.trim(),
            request.interview_type.trim(),
            request.difficulty,
            request.total_rounds
        );

        Ok(StartInterviewResponse {
            session_id,
            question,
        })
    }

    /// Evaluates an answer to the current question and advances the session.
    pub async fn submit_answer(
        &self,
        session_id: SessionId,
        answer: &str,
    ) -> Result<SubmitAnswerResponse, InterviewError> {
        // Reject unknown ids before allocating a lock for them.
        self.store.get(session_id).await?;
        let _guard = self.locks.acquire(session_id).await;

        let session = self.store.get(session_id).await?;
        if session.is_complete() {
            warn!("Answer submitted to completed interview {session_id}");
            return Err(InterviewError::AlreadyComplete(session_id));
        }
        if answer.trim().is_empty() {
            return Err(InterviewError::Validation(
                "answer cannot be empty".to_string(),
            ));
        }

        let question = session.current_question.clone();
        let raw = self
            .generate(
                CallStage::Evaluation,
                &build_evaluation_prompt(&session, &question, answer),
            )
            .await?;

        let evaluation = normalize(&raw).map_err(|failure| {
            warn!(
                "Interview {session_id} round {}: evaluation unparseable, session left unchanged",
                session.current_round
            );
            InterviewError::from(failure)
        })?;

        let previous_difficulty = session.difficulty;
        let difficulty = next_difficulty(previous_difficulty, evaluation.score);
        let mut working = session;
        working.record_turn(
            Turn {
                question,
                answer: answer.to_string(),
                evaluation: evaluation.clone(),
            },
            difficulty,
        );

        let outcome = if working.is_complete() {
            let report = self
                .generate(CallStage::FinalReport, &build_final_report_prompt(&working))
                .await?;
            working.final_report = Some(report.clone());
            RoundOutcome::Complete {
                final_report: report,
            }
        } else {
            let next_question = self
                .generate(CallStage::Question, &build_question_prompt(&working))
                .await?;
            working.current_question = next_question.clone();
            RoundOutcome::Continue {
                next_question,
                current_round: working.current_round,
            }
        };

        let complete = working.is_complete();
        let average_score = working.average_score;
        info!(
            "Interview {session_id}: scored {}/10, difficulty {} -> {}, average {:.2}{}",
            evaluation.score,
            previous_difficulty,
            difficulty,
            average_score,
            if complete { ", complete" } else { "" }
        );

        self.store
            .update(
                session_id,
                Box::new(move |stored: &mut Session| *stored = working),
            )
            .await?;

        Ok(SubmitAnswerResponse {
            evaluation,
            complete,
            outcome,
            average_score,
        })
    }

    pub async fn summary(&self, session_id: SessionId) -> Result<SessionSummary, InterviewError> {
        let session = self.store.get(session_id).await?;
        Ok(SessionSummary::from(&session))
    }

    pub async fn transcript(
        &self,
        session_id: SessionId,
    ) -> Result<SessionTranscript, InterviewError> {
        let session = self.store.get(session_id).await?;
        let complete = session.is_complete();
        Ok(SessionTranscript { session, complete })
    }

    fn validate_start(&self, request: &StartInterviewRequest) -> Result<(), InterviewError> {
        if request.field.trim().is_empty() {
            return Err(InterviewError::Validation(
                "field cannot be empty".to_string(),
            ));
        }
        if request.interview_type.trim().is_empty() {
            return Err(InterviewError::Validation(
                "interview_type cannot be empty".to_string(),
            ));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&request.difficulty) {
            return Err(InterviewError::Validation(format!(
                "difficulty must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}"
            )));
        }
        let max_rounds = self.settings.max_total_rounds.max(1);
        if !(1..=max_rounds).contains(&request.total_rounds) {
            return Err(InterviewError::Validation(format!(
                "total_rounds must be between 1 and {max_rounds}"
            )));
        }
        Ok(())
    }

    async fn generate(&self, stage: CallStage, prompt: &str) -> Result<String, InterviewError> {
        let timeout = self.settings.llm_timeout;
        match tokio::time::timeout(timeout, self.llm.generate_text(prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(source)) => Err(InterviewError::Collaborator { stage, source }),
            Err(_) => Err(InterviewError::Collaborator {
                stage,
                source: LlmError::Timeout(timeout.as_secs()),
            }),
        }
    }
}
