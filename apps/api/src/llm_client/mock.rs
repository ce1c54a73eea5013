//! Scripted `TextGenerator` for exercising the interview flow without network calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};
use crate::interview::prompts::{EVALUATION_MARKER, FINAL_REPORT_MARKER};

/// What the mock does for one kind of prompt.
pub enum Reply {
    Text(String),
    /// Returns the text only after the delay has elapsed.
    Delayed(Duration, String),
    Fail,
    /// Sleeps far beyond any configured timeout.
    Hang,
}

/// Routes prompts by kind: evaluation prompts pop from a queue, question and
/// final-report prompts get canned answers.
pub struct ScriptedGenerator {
    evaluations: Mutex<VecDeque<Reply>>,
    question_reply: Mutex<Option<Reply>>,
    report_reply: Mutex<Option<Reply>>,
    question_count: AtomicU32,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            evaluations: Mutex::new(VecDeque::new()),
            question_reply: Mutex::new(None),
            report_reply: Mutex::new(None),
            question_count: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues raw evaluation text, returned in order to evaluation prompts.
    pub fn with_evaluations<I, S>(self, evaluations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evaluations
            .lock()
            .unwrap()
            .extend(evaluations.into_iter().map(|e| Reply::Text(e.into())));
        self
    }

    pub fn push_evaluation(&self, reply: Reply) {
        self.evaluations.lock().unwrap().push_back(reply);
    }

    /// Overrides the next question reply (one-shot).
    pub fn set_question_reply(&self, reply: Reply) {
        *self.question_reply.lock().unwrap() = Some(reply);
    }

    /// Overrides the next final-report reply (one-shot).
    pub fn set_report_reply(&self, reply: Reply) {
        *self.report_reply.lock().unwrap() = Some(reply);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

async fn play(reply: Reply) -> Result<String, LlmError> {
    match reply {
        Reply::Text(text) => Ok(text),
        Reply::Delayed(delay, text) => {
            tokio::time::sleep(delay).await;
            Ok(text)
        }
        Reply::Fail => Err(LlmError::Api {
            status: 500,
            message: "scripted failure".to_string(),
        }),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(60 * 60)).await;
            Err(LlmError::EmptyContent)
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if prompt.contains(EVALUATION_MARKER) {
            let next = self.evaluations.lock().unwrap().pop_front();
            return match next {
                Some(reply) => play(reply).await,
                None => Err(LlmError::EmptyContent),
            };
        }

        if prompt.contains(FINAL_REPORT_MARKER) {
            let reply = self.report_reply.lock().unwrap().take();
            return match reply {
                Some(reply) => play(reply).await,
                None => Ok("Overall Summary: solid performance.".to_string()),
            };
        }

        let reply = self.question_reply.lock().unwrap().take();
        match reply {
            Some(reply) => play(reply).await,
            None => {
                let n = self.question_count.fetch_add(1, Ordering::Relaxed) + 1;
                Ok(format!("Question {n}"))
            }
        }
    }
}
