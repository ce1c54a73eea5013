//! Feedback normalization: turns raw evaluator output into an `Evaluation`.
//!
//! The evaluator is asked for strict JSON but routinely wraps it in prose or
//! code fences. Extraction runs an ordered list of strategies, first hit wins:
//! 1. the whole (trimmed) text as a JSON object
//! 2. the first fenced block (```json or bare ```) holding a JSON object
//! 3. the span from the first `{` to the last `}`
//!
//! A parsed object with no usable score at all is rejected rather than
//! defaulted: we never invent a score.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::interview::models::{Evaluation, MAX_SCORE, MIN_SCORE};

const FENCE: &str = "```";

/// The raw text could not be turned into a usable evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("evaluation could not be parsed")]
pub struct ParseFailure {
    pub raw: String,
}

type JsonObject = Map<String, Value>;

/// Extraction strategies, tried in order.
const STRATEGIES: [(&str, fn(&str) -> Option<JsonObject>); 3] = [
    ("direct", parse_direct),
    ("fenced", parse_fenced_block),
    ("braces", parse_outer_braces),
];

/// Parses and normalizes raw evaluator output.
pub fn normalize(raw: &str) -> Result<Evaluation, ParseFailure> {
    let text = raw.trim();

    let object = STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(text);
        if found.is_some() {
            debug!("Evaluation JSON extracted via {name} strategy");
        }
        found
    });

    object
        .and_then(|obj| normalize_object(&obj))
        .ok_or_else(|| ParseFailure {
            raw: raw.to_string(),
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction strategies
// ────────────────────────────────────────────────────────────────────────────

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_direct(text: &str) -> Option<JsonObject> {
    parse_object(text)
}

/// Tries every fenced block in order; the opening fence may carry a `json` tag.
fn parse_fenced_block(text: &str) -> Option<JsonObject> {
    let mut rest = text;
    while let Some(open) = rest.find(FENCE) {
        let body = strip_json_tag(&rest[open + FENCE.len()..]);
        let close = body.find(FENCE)?;
        if let Some(object) = parse_object(&body[..close]) {
            return Some(object);
        }
        rest = &body[close + FENCE.len()..];
    }
    None
}

fn strip_json_tag(text: &str) -> &str {
    match text.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &text[4..],
        _ => text,
    }
}

fn parse_outer_braces(text: &str) -> Option<JsonObject> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&text[start..=end])
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

fn normalize_object(payload: &JsonObject) -> Option<Evaluation> {
    let communication_score = score_field(payload, "communication_score");
    let technical_score = score_field(payload, "technical_score");
    let confidence_score = score_field(payload, "confidence_score");
    let mut score = score_field(payload, "score");

    if score == 0 {
        score = mean_of_reported(&[communication_score, technical_score, confidence_score]);
    }

    if [score, communication_score, technical_score, confidence_score]
        .iter()
        .all(|&s| s == 0)
    {
        return None;
    }

    Some(Evaluation {
        score,
        communication_score,
        technical_score,
        confidence_score,
        strengths: text_field(payload, "strengths"),
        weaknesses: text_field(payload, "weaknesses"),
    })
}

/// Coerces a score field. Absent or non-numeric → 0 (unreported);
/// any other value is clamped into `[1, 10]`.
fn score_field(payload: &JsonObject, key: &str) -> u8 {
    match payload.get(key).and_then(coerce_integer) {
        None | Some(0) => 0,
        Some(n) => n.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8,
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Rounded mean (ties to even) of the nonzero scores; 0 if there are none.
fn mean_of_reported(scores: &[u8]) -> u8 {
    let reported: Vec<f64> = scores
        .iter()
        .filter(|&&s| s > 0)
        .map(|&s| f64::from(s))
        .collect();
    if reported.is_empty() {
        return 0;
    }
    let mean = reported.iter().sum::<f64>() / reported.len() as f64;
    mean.round_ties_even() as u8
}

fn text_field(payload: &JsonObject, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
