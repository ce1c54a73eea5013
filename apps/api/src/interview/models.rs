//! Session data model and the request/response shapes of the interview API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Normalized scoring for one answer.
///
/// Sub-scores use `0` for "not reported by the evaluator". `score` is always
/// in `[1, 10]` once it has been recorded against a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub communication_score: u8,
    pub technical_score: u8,
    pub confidence_score: u8,
    pub strengths: String,
    pub weaknesses: String,
}

/// One question/answer/evaluation triple. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    pub evaluation: Evaluation,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// Everything needed to open a session. Validated before it reaches the store.
#[derive(Debug, Clone)]
pub struct SessionInit {
    pub field: String,
    pub interview_type: String,
    pub difficulty: u8,
    pub total_rounds: u32,
    pub resume: String,
    pub job_description: String,
    pub opening_question: String,
}

/// Full state of one interview.
///
/// Invariants:
/// - `history.len() == score_history.len() == current_round - 1`
/// - `current_round <= total_rounds + 1`; equality means the interview is complete
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub field: String,
    pub interview_type: String,
    pub difficulty: u8,
    pub total_rounds: u32,
    pub current_round: u32,
    pub current_question: String,
    pub resume: String,
    pub job_description: String,
    pub history: Vec<Turn>,
    pub score_history: Vec<u8>,
    pub average_score: f64,
    pub final_report: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, init: SessionInit) -> Self {
        let now = Utc::now();
        Self {
            id,
            field: init.field,
            interview_type: init.interview_type,
            difficulty: init.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            total_rounds: init.total_rounds.max(1),
            current_round: 1,
            current_question: init.opening_question,
            resume: init.resume,
            job_description: init.job_description,
            history: Vec::new(),
            score_history: Vec::new(),
            average_score: 0.0,
            final_report: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_round > self.total_rounds
    }

    pub fn completed_rounds(&self) -> usize {
        self.score_history.len()
    }

    /// Appends a finished turn and advances the round counter.
    /// `next_difficulty` comes from the difficulty controller.
    pub fn record_turn(&mut self, turn: Turn, next_difficulty: u8) {
        self.score_history.push(turn.evaluation.score);
        self.history.push(turn);
        self.average_score = average_score(&self.score_history);
        self.difficulty = next_difficulty;
        self.current_round += 1;
        self.updated_at = Utc::now();
    }
}

/// Mean of the recorded scores rounded to two decimals, `0.0` when empty.
pub fn average_score(scores: &[u8]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    let mean = f64::from(sum) / scores.len() as f64;
    (mean * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// API shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StartInterviewRequest {
    pub field: String,
    pub interview_type: String,
    pub difficulty: u8,
    pub total_rounds: u32,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartInterviewResponse {
    pub session_id: SessionId,
    pub question: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    /// Kept as text so a malformed id surfaces as an invalid session.
    pub session_id: String,
    pub answer: String,
}

/// What happens after an answer is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoundOutcome {
    Continue {
        next_question: String,
        current_round: u32,
    },
    Complete {
        final_report: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub evaluation: Evaluation,
    pub complete: bool,
    #[serde(flatten)]
    pub outcome: RoundOutcome,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_rounds: u32,
    pub completed_rounds: usize,
    pub average_score: f64,
    pub score_history: Vec<u8>,
    pub current_difficulty: u8,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            total_rounds: session.total_rounds,
            completed_rounds: session.completed_rounds(),
            average_score: session.average_score,
            score_history: session.score_history.clone(),
            current_difficulty: session.difficulty,
        }
    }
}

/// Read-only view of a whole session, including its transcript.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTranscript {
    #[serde(flatten)]
    pub session: Session,
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() -> SessionInit {
        SessionInit {
            field: "Backend".to_string(),
            interview_type: "technical".to_string(),
            difficulty: 3,
            total_rounds: 2,
            resume: String::new(),
            job_description: String::new(),
            opening_question: "What is a mutex?".to_string(),
        }
    }

    fn evaluation(score: u8) -> Evaluation {
        Evaluation {
            score,
            communication_score: 0,
            technical_score: 0,
            confidence_score: 0,
            strengths: String::new(),
            weaknesses: String::new(),
        }
    }

    #[test]
    fn test_new_session_starts_at_round_one() {
        let session = Session::new(Uuid::new_v4(), init());
        assert_eq!(session.current_round, 1);
        assert!(session.history.is_empty());
        assert!(session.score_history.is_empty());
        assert_eq!(session.average_score, 0.0);
        assert_eq!(session.current_question, "What is a mutex?");
        assert!(!session.is_complete());
    }

    #[test]
    fn test_new_session_clamps_out_of_range_difficulty() {
        let mut raw = init();
        raw.difficulty = 42;
        assert_eq!(Session::new(Uuid::new_v4(), raw).difficulty, 10);
    }

    #[test]
    fn test_record_turn_keeps_history_parallel_to_round() {
        let mut session = Session::new(Uuid::new_v4(), init());
        session.record_turn(
            Turn {
                question: "q1".into(),
                answer: "a1".into(),
                evaluation: evaluation(9),
            },
            5,
        );

        assert_eq!(session.current_round, 2);
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.score_history, vec![9]);
        assert_eq!(session.difficulty, 5);
        assert_eq!(session.history.len() as u32, session.current_round - 1);
    }

    #[test]
    fn test_average_score_rounds_to_two_decimals() {
        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[7]), 7.0);
        assert_eq!(average_score(&[7, 8, 8]), 7.67);
        assert_eq!(average_score(&[1, 2]), 1.5);
    }

    #[test]
    fn test_submit_response_serializes_flat() {
        let response = SubmitAnswerResponse {
            evaluation: evaluation(6),
            complete: false,
            outcome: RoundOutcome::Continue {
                next_question: "Next?".into(),
                current_round: 2,
            },
            average_score: 6.0,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["complete"], false);
        assert_eq!(json["next_question"], "Next?");
        assert_eq!(json["current_round"], 2);
        assert!(json.get("final_report").is_none());
        assert_eq!(json["evaluation"]["score"], 6);
    }

    #[test]
    fn test_start_request_defaults_optional_context() {
        let request: StartInterviewRequest = serde_json::from_value(serde_json::json!({
            "field": "Backend",
            "interview_type": "technical",
            "difficulty": 3,
            "total_rounds": 2
        }))
        .unwrap();
        assert!(request.resume.is_empty());
        assert!(request.job_description.is_empty());
    }
}
