//! Core data types for the Artscout pipeline.
//!
//! Every record here lives for exactly one request: created by a stage,
//! consumed by the next, and dropped once the response is written.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Raw image bytes received from the client.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    /// Binary payload as uploaded
    pub bytes: Vec<u8>,

    /// Original file name, if the client sent one (logging only)
    pub file_name: Option<String>,
}

impl ImageBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Original byte size.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Publicly fetchable URL returned by the image host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostedImageUrl(String);

impl HostedImageUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HostedImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Price attached to a shopping-style visual match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    /// Display value, e.g. "$1,200.00*"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Numeric amount as parsed by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_value: Option<f64>,

    /// Currency symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// One ranked item from the reverse-image-search provider.
///
/// Every field is optional and a mistyped field reads as absent, so one odd
/// entry never drops the whole match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualMatch {
    /// 1-based provider rank, when reported
    #[serde(deserialize_with = "lenient")]
    pub position: Option<u32>,

    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,

    /// Site name, e.g. "Wikipedia"
    #[serde(deserialize_with = "lenient")]
    pub source: Option<String>,

    /// Page containing the matching image
    #[serde(deserialize_with = "lenient")]
    pub link: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub thumbnail: Option<String>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub price: Option<Price>,
}

/// Deserialize a field, treating a value of the wrong shape as missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl VisualMatch {
    /// Display value of the price, if any.
    pub fn price_value(&self) -> Option<&str> {
        self.price.as_ref().and_then(|p| p.value.as_deref())
    }
}

/// Visual matches plus the auxiliary context the provider returned alongside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchContext {
    /// Provider-ranked matches; empty when the provider returned none
    pub visual_matches: Vec<VisualMatch>,

    /// Text the provider read off the image
    pub extracted_text: Option<String>,

    /// Provider's best-guess label for the image
    pub best_guess_label: Option<String>,

    /// Knowledge-graph subtitle (e.g. "Painting by Vincent van Gogh")
    pub categories: Option<String>,
}

/// Structured identification derived from the model's reply.
///
/// Either every structured field came from one successful parse, or every
/// structured field is at its default. `raw_text` is always the verbatim
/// model output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub artist_name: Option<String>,

    /// 0-100
    pub artist_confidence_score: u8,

    pub artwork_title: Option<String>,

    /// 0-100
    pub artwork_confidence_score: u8,

    pub style_and_medium: Option<String>,

    pub reasoning_summary: Option<String>,

    pub visual_characteristics: Option<String>,

    /// Verbatim model output
    pub raw_text: String,
}

impl AnalysisResult {
    /// All-defaults record that still carries the model's text.
    pub fn degraded(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// True when no structured field was populated.
    pub fn is_degraded(&self) -> bool {
        *self == Self::degraded(self.raw_text.clone())
    }
}

/// Wall-clock duration of each stage. Observational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingReport {
    pub upload: Duration,
    pub search: Duration,
    /// Search attempts beyond the first
    pub search_retries: u32,
    pub analysis: Duration,
    pub total: Duration,
}

/// Everything a successful pipeline run produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub image_url: HostedImageUrl,
    pub timing: TimingReport,
    pub analysis: AnalysisResult,
    pub matches: Vec<VisualMatch>,
}
