//! Decoding of model replies.

use serde::{Deserialize, Serialize};

use super::InsightsError;

/// Structured insights about a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResult {
    summary: String,
    #[serde(rename = "insights")]
    key_insights: Vec<String>,
    writing_tips: String,
}

impl InsightsResult {
    pub fn new(summary: impl Into<String>, key_insights: Vec<String>, writing_tips: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            key_insights,
            writing_tips: writing_tips.into(),
        }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn key_insights(&self) -> &[String] {
        &self.key_insights
    }

    pub fn writing_tips(&self) -> &str {
        &self.writing_tips
    }
}

/// A generated figure caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    caption: String,
}

impl Caption {
    pub fn caption(&self) -> &str {
        &self.caption
    }
}

/// Parses the model's reply into an [`InsightsResult`].
///
/// The reply must be a JSON object carrying `summary`, `insights`, and
/// `writingTips` with the expected types. Additional fields are ignored.
///
/// # Errors
///
/// Returns [`InsightsError::Decode`] if the reply is not JSON or a required
/// field is missing or mistyped.
///
/// # Examples
///
/// ```
/// # use chartwell::insights::parse_response;
/// let reply = r#"{"summary":"s","insights":["a","b"],"writingTips":"t"}"#;
/// let result = parse_response(reply).unwrap();
/// assert_eq!(result.key_insights(), ["a", "b"]);
///
/// assert!(parse_response(r#"{"summary":"s"}"#).is_err());
/// ```
pub fn parse_response(raw: &str) -> Result<InsightsResult, InsightsError> {
    serde_json::from_str(raw.trim()).map_err(|err| InsightsError::Decode(err.to_string()))
}

/// Wraps a free-text caption reply.
pub fn parse_caption(raw: &str) -> Caption {
    Caption {
        caption: raw.trim().to_string(),
    }
}
