//! Tolerant parser for the model's identification reply.
//!
//! Strategies are tried in order and the first one that yields a JSON object
//! wins. If none does, the result is the all-defaults record carrying the raw
//! text. Parsing never fails.

use crate::types::AnalysisResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCED_JSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid fenced-json regex"));

/// One way of pulling a JSON object out of free-form model output.
type ParseStrategy = fn(&str) -> Option<Value>;

/// Ordered strategy list. Earlier entries win.
const STRATEGIES: &[(&str, ParseStrategy)] =
    &[("whole_body", whole_body), ("fenced_json", fenced_json)];

/// Parse a model reply into an [`AnalysisResult`].
///
/// `raw_text` on the result is always `raw` unchanged.
pub fn parse_analysis(raw: &str) -> AnalysisResult {
    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(raw) {
            tracing::debug!("Parsed analysis via {name} strategy");
            return flatten(&value, raw);
        }
    }

    tracing::warn!(
        "Could not extract structured analysis from LLM response ({} chars), returning defaults",
        raw.len()
    );
    AnalysisResult::degraded(raw)
}

/// The whole reply, trimmed, is a JSON object.
fn whole_body(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    parse_object(trimmed)
}

/// The first ```` ```json ```` fenced block holds a JSON object.
fn fenced_json(raw: &str) -> Option<Value> {
    let captures = FENCED_JSON_RE.captures(raw)?;
    parse_object(captures.get(1)?.as_str())
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("JSON candidate rejected: {e}");
            None
        }
    }
}

/// Flatten the two-level schema. Missing or mistyped leaves take defaults.
fn flatten(value: &Value, raw: &str) -> AnalysisResult {
    AnalysisResult {
        artist_name: text_leaf(value, "/identification/artist_name"),
        artist_confidence_score: score_leaf(value, "/identification/artist_confidence_score"),
        artwork_title: text_leaf(value, "/identification/artwork_title"),
        artwork_confidence_score: score_leaf(value, "/identification/artwork_confidence_score"),
        style_and_medium: text_leaf(value, "/analysis/style_and_medium"),
        reasoning_summary: text_leaf(value, "/analysis/reasoning_summary"),
        visual_characteristics: text_leaf(value, "/analysis/visual_characteristics"),
        raw_text: raw.to_string(),
    }
}

fn text_leaf(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(String::from)
}

/// Confidence as 0-100. Accepts numbers and numeric strings ("85", "85%").
fn score_leaf(value: &Value, pointer: &str) -> u8 {
    let score = match value.pointer(pointer) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}
