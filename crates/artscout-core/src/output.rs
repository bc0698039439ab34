//! Response shaping for the HTTP boundary.
//!
//! Converts a [`SearchOutcome`] into the JSON contract the web client reads:
//! camelCase envelope, snake_case analysis fields, and timings rendered as
//! `"<n>ms"` strings.

use crate::error::PipelineError;
use crate::types::{AnalysisResult, SearchOutcome, TimingReport, VisualMatch};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Successful search response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub image_url: String,
    pub timing: TimingView,
    pub analysis: AnalysisView,
    pub results: ResultsView,
}

/// Stage timings as display strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingView {
    pub total: String,
    pub upload: String,
    pub search: String,
    pub search_retries: u32,
    pub analysis: String,
}

/// Flattened identification plus the verbatim model text.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub artist_name: Option<String>,
    pub artist_confidence_score: u8,
    pub artwork_title: Option<String>,
    pub artwork_confidence_score: u8,
    pub style_and_medium: Option<String>,
    pub reasoning_summary: Option<String>,
    pub visual_characteristics: Option<String>,
    pub markdown: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    pub organic: Vec<OrganicResult>,
    /// Always empty; no exact-match strategy exists yet
    pub exact_match: Vec<OrganicResult>,
    pub total_results: usize,
}

/// One visual match in the client's shape.
#[derive(Debug, Clone, Serialize)]
pub struct OrganicResult {
    pub position: u32,
    pub title: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Error body for failed searches and bad requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub const SEARCH_FAILED: &'static str = "Search failed";
    pub const NO_IMAGE: &'static str = "No image file provided";
    pub const IMAGE_TOO_LARGE: &'static str = "Image file too large";

    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl From<&PipelineError> for ErrorResponse {
    fn from(err: &PipelineError) -> Self {
        Self {
            error: Self::SEARCH_FAILED.to_string(),
            details: Some(err.details()),
        }
    }
}

/// Render a duration as whole milliseconds, e.g. `"1234ms"`.
pub fn format_ms(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

impl From<&TimingReport> for TimingView {
    fn from(timing: &TimingReport) -> Self {
        Self {
            total: format_ms(timing.total),
            upload: format_ms(timing.upload),
            search: format_ms(timing.search),
            search_retries: timing.search_retries,
            analysis: format_ms(timing.analysis),
        }
    }
}

impl From<AnalysisResult> for AnalysisView {
    fn from(result: AnalysisResult) -> Self {
        Self {
            artist_name: result.artist_name,
            artist_confidence_score: result.artist_confidence_score,
            artwork_title: result.artwork_title,
            artwork_confidence_score: result.artwork_confidence_score,
            style_and_medium: result.style_and_medium,
            reasoning_summary: result.reasoning_summary,
            visual_characteristics: result.visual_characteristics,
            markdown: result.raw_text,
        }
    }
}

impl OrganicResult {
    /// `index` is the 0-based list position, used when the provider sent none.
    fn from_match(index: usize, m: VisualMatch) -> Self {
        let price = m.price_value().map(String::from);
        Self {
            position: m.position.unwrap_or(index as u32 + 1),
            title: m.title,
            url: m.link,
            source: m.source,
            thumbnail: m.thumbnail,
            price,
        }
    }
}

impl From<Vec<VisualMatch>> for ResultsView {
    fn from(matches: Vec<VisualMatch>) -> Self {
        let total_results = matches.len();
        Self {
            organic: matches
                .into_iter()
                .enumerate()
                .map(|(i, m)| OrganicResult::from_match(i, m))
                .collect(),
            exact_match: Vec::new(),
            total_results,
        }
    }
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            success: true,
            image_url: outcome.image_url.into_string(),
            timing: TimingView::from(&outcome.timing),
            analysis: AnalysisView::from(outcome.analysis),
            results: ResultsView::from(outcome.matches),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HostedImageUrl, Price};
    use serde_json::json;

    fn outcome() -> SearchOutcome {
        SearchOutcome {
            image_url: HostedImageUrl::new("https://img/x.png"),
            timing: TimingReport {
                upload: Duration::from_millis(412),
                search: Duration::from_micros(5_321_900),
                search_retries: 2,
                analysis: Duration::from_millis(1800),
                total: Duration::from_millis(7534),
            },
            analysis: AnalysisResult {
                artist_name: Some("Claude Monet".into()),
                artist_confidence_score: 85,
                raw_text: "{...}".into(),
                ..AnalysisResult::default()
            },
            matches: vec![
                VisualMatch {
                    position: Some(1),
                    title: Some("Water Lilies".into()),
                    source: Some("MoMA".into()),
                    link: Some("https://moma.org/1".into()),
                    thumbnail: Some("https://t/1.jpg".into()),
                    price: None,
                },
                VisualMatch {
                    position: None,
                    title: Some("Water Lilies poster".into()),
                    source: Some("Etsy".into()),
                    link: Some("https://etsy.com/2".into()),
                    thumbnail: None,
                    price: Some(Price {
                        value: Some("$20".into()),
                        ..Price::default()
                    }),
                },
            ],
        }
    }

    #[test]
    fn test_response_wire_shape() {
        let value = serde_json::to_value(SearchResponse::from(outcome())).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["imageUrl"], "https://img/x.png");
        assert_eq!(
            value["timing"],
            json!({
                "total": "7534ms",
                "upload": "412ms",
                "search": "5321ms",
                "searchRetries": 2,
                "analysis": "1800ms"
            })
        );
        assert_eq!(value["analysis"]["artist_name"], "Claude Monet");
        assert_eq!(value["analysis"]["artist_confidence_score"], 85);
        assert_eq!(value["analysis"]["artwork_title"], Value::Null);
        assert_eq!(value["analysis"]["reasoning_summary"], Value::Null);
        assert_eq!(value["analysis"]["markdown"], "{...}");
        assert_eq!(value["results"]["exactMatch"], json!([]));
        assert_eq!(value["results"]["totalResults"], 2);
    }

    #[test]
    fn test_organic_results_keep_order_and_default_position() {
        let value = serde_json::to_value(SearchResponse::from(outcome())).unwrap();
        let organic = value["results"]["organic"].as_array().unwrap();

        assert_eq!(organic.len(), 2);
        assert_eq!(organic[0]["title"], "Water Lilies");
        assert_eq!(organic[0]["url"], "https://moma.org/1");
        assert!(organic[0].get("price").is_none());
        assert_eq!(organic[1]["position"], 2);
        assert_eq!(organic[1]["price"], "$20");
        assert_eq!(organic[1]["thumbnail"], Value::Null);
    }

    #[test]
    fn test_error_response_uses_upstream_payload() {
        let err = PipelineError::SearchExhausted {
            attempts: 3,
            message: "SerpApi error: Server busy".into(),
            payload: Some(json!({"error": "Server busy"})),
        };
        let value = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            value,
            json!({"error": "Search failed", "details": {"error": "Server busy"}})
        );
    }

    #[test]
    fn test_error_response_without_details() {
        let value = serde_json::to_value(ErrorResponse::message(ErrorResponse::NO_IMAGE)).unwrap();
        assert_eq!(value, json!({"error": "No image file provided"}));
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(Duration::ZERO), "0ms");
        assert_eq!(format_ms(Duration::from_micros(999)), "0ms");
        assert_eq!(format_ms(Duration::from_secs(2)), "2000ms");
    }
}
