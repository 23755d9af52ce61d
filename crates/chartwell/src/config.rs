//! Configuration types for Chartwell.
//!
//! This module provides configuration structures that control chart styling,
//! SVG canvas size, and the language-model endpoint used for insights. All
//! types implement [`serde::Deserialize`] so they can be loaded from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and insights settings.
//! - [`StyleConfig`] - Palette, colors, and canvas size.
//! - [`InsightsConfig`] - Endpoint, model, credentials, and prompt sampling bounds.
//!
//! # Example
//!
//! ```
//! # use chartwell::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().chart_style().is_ok());
//! assert_eq!(config.insights().sample_rows(), 100);
//! ```

use serde::Deserialize;

use chartwell_core::{
    chart::{ChartStyle, Palette},
    color::Color,
};

use crate::insights::PromptOptions;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Insights configuration section.
    #[serde(default)]
    insights: InsightsConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: StyleConfig, insights: InsightsConfig) -> Self {
        Self { style, insights }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the insights configuration.
    pub fn insights(&self) -> &InsightsConfig {
        &self.insights
    }
}

/// Visual styling configuration.
///
/// Colors are stored as strings and validated when the [`ChartStyle`] is
/// assembled. Unset colors fall back to the [`ChartStyle`] defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    palette: Palette,
    base_color: Option<String>,
    background_color: Option<String>,
    text_color: Option<String>,
    /// Width of the exported SVG canvas in pixels.
    width: f32,
    /// Height of the exported SVG canvas in pixels.
    height: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            base_color: None,
            background_color: None,
            text_color: None,
            width: 800.0,
            height: 450.0,
        }
    }
}

impl StyleConfig {
    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns a copy with the palette replaced.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Returns a copy with the base (accent) color string replaced.
    pub fn with_base_color(mut self, color: impl Into<String>) -> Self {
        self.base_color = Some(color.into());
        self
    }

    /// Returns a copy with the background color string replaced.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Returns a copy with the text color string replaced.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Returns a copy with the canvas size replaced.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Assembles the [`ChartStyle`] described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending field if a configured color
    /// string cannot be parsed into a valid [`Color`].
    pub fn chart_style(&self) -> Result<ChartStyle, String> {
        let mut style = ChartStyle::default().with_palette(self.palette);
        if let Some(color) = parse_color("base_color", self.base_color.as_deref())? {
            style = style.with_base_color(color);
        }
        if let Some(color) = parse_color("background_color", self.background_color.as_deref())? {
            style = style.with_background_color(color);
        }
        if let Some(color) = parse_color("text_color", self.text_color.as_deref())? {
            style = style.with_text_color(color);
        }
        Ok(style)
    }
}

fn parse_color(field: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

/// Language-model endpoint and prompt settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    /// OpenAI-compatible chat-completions URL.
    endpoint: String,
    model: String,
    /// Name of the environment variable holding the API key.
    api_key_env: String,
    timeout_secs: u64,
    /// Maximum number of rows sent to the model.
    sample_rows: usize,
    /// Number of rows spelled out in the prompt text.
    preview_rows: usize,
    /// Language the model is asked to answer in.
    language: String,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            sample_rows: 100,
            preview_rows: 5,
            language: "English".to_string(),
        }
    }
}

impl InsightsConfig {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Returns the prompt sampling options derived from this configuration.
    pub fn prompt_options(&self) -> PromptOptions {
        PromptOptions::new(self.sample_rows, self.preview_rows, self.language.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.style().chart_style(), Ok(ChartStyle::default()));
        assert_eq!(config.style().width(), 800.0);
        assert_eq!(config.insights().api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.insights().preview_rows(), 5);
        assert_eq!(config.insights().language(), "English");
    }

    #[test]
    fn test_chart_style_applies_colors() {
        let style = StyleConfig::default()
            .with_palette(Palette::Warm)
            .with_background_color("#ffffff")
            .with_text_color("black");

        let chart_style = style.chart_style().unwrap();

        assert_eq!(chart_style.palette(), Palette::Warm);
        assert_eq!(chart_style.background_color(), Color::new("#ffffff").unwrap());
        assert_eq!(chart_style.text_color(), Color::new("black").unwrap());
        assert_eq!(chart_style.base_color(), ChartStyle::default().base_color());
    }

    #[test]
    fn test_chart_style_rejects_invalid_color() {
        let style = StyleConfig::default().with_base_color("not-a-color");

        let err = style.chart_style().unwrap_err();
        assert!(err.contains("base_color"), "{err}");
    }

    #[test]
    fn test_prompt_options_follow_config() {
        let insights = InsightsConfig::default().with_language("Japanese");
        let options = insights.prompt_options();

        assert_eq!(options.sample_rows(), 100);
        assert_eq!(options.preview_rows(), 5);
        assert_eq!(options.language(), "Japanese");
    }
}
