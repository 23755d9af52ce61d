//! Chartwell - turn delimited text into charts and written insights.
//!
//! Parsing, chart building, export, and language-model insights for tabular
//! data. A dataset is parsed from CSV-like text, a [`selection::ChartSelection`]
//! picks the columns to plot, and the resulting [`chart::ChartSpec`] is
//! exported as SVG, PNG or JSON.

pub mod chart;
pub mod config;
pub mod export;
pub mod insights;
pub mod session;

mod error;

pub use chartwell_core::{color, dataset, geometry, selection};
pub use chartwell_parser::{Delimiter, ParseOptions};

pub use error::ChartwellError;

use std::{fs, io::Read};

use log::{debug, info, trace};

use chartwell_core::{
    chart::ChartSpec,
    dataset::Dataset,
    geometry::Size,
    selection::ChartSelection,
};

use config::AppConfig;
use export::Exporter;
use insights::{
    Caption, CaptionRequest, HttpLanguageModel, InsightsResult, LanguageModel, PromptPayload,
};
use session::Session;

/// Builder for turning datasets into charts and insights.
///
/// This provides an API for processing a dataset through parsing, chart
/// building, and export stages, using one [`AppConfig`] throughout.
///
/// # Examples
///
/// ```rust
/// use chartwell::{ParseOptions, Workbench, config::AppConfig, selection::ChartSelection};
///
/// let workbench = Workbench::new(AppConfig::default());
///
/// // Parse text into a dataset
/// let dataset = workbench.parse("month,sales\nJan,10\nFeb,20", &ParseOptions::default());
///
/// // Build the chart for the default selection
/// let selection = ChartSelection::for_dataset(&dataset, Default::default());
/// let chart = workbench.build(&dataset, &selection).expect("Failed to build");
///
/// // Render it
/// let svg = workbench.render_svg(&chart).expect("Failed to render");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Default)]
pub struct Workbench {
    config: AppConfig,
}

impl Workbench {
    /// Create a new workbench with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read dataset text from `path`, or from standard input when `path` is `-`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Read`] if the source cannot be read. Nothing
    /// else is touched, so a session keeps its current dataset.
    pub fn read_source(&self, path: &str) -> Result<String, ChartwellError> {
        info!(path = path; "Reading dataset");
        if path == "-" {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| ChartwellError::new_read_error(path, err))?;
            return Ok(text);
        }
        fs::read_to_string(path).map_err(|err| ChartwellError::new_read_error(path, err))
    }

    /// Parse delimited text into a dataset.
    ///
    /// Parsing never fails: malformed input degrades to fewer rows or an
    /// empty dataset.
    pub fn parse(&self, text: &str, options: &ParseOptions) -> Dataset {
        let dataset = chartwell_parser::parse(text, options);
        debug!(
            rows = dataset.row_count(),
            columns = dataset.column_count();
            "Dataset parsed"
        );
        dataset
    }

    /// Build the chart specification for `selection` over `dataset`.
    ///
    /// Colors come from the configured style.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::NothingToRender`] for a dataset without
    /// rows, [`ChartwellError::Selection`] if the selection names a column
    /// the dataset does not have, and [`ChartwellError::Config`] if a
    /// configured color is invalid.
    pub fn build(
        &self,
        dataset: &Dataset,
        selection: &ChartSelection,
    ) -> Result<ChartSpec, ChartwellError> {
        if dataset.is_empty() {
            return Err(chart::NothingToRender.into());
        }
        selection.validate_all(dataset.column_count())?;
        let style = self
            .config
            .style()
            .chart_style()
            .map_err(ChartwellError::Config)?;

        info!(kind:% = selection.kind(); "Building chart");
        let spec = chart::build(dataset, selection, &style)?;
        trace!(spec:?; "Built chart");
        Ok(spec)
    }

    /// Render a chart to an SVG string sized by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Export`] if the configured canvas is invalid.
    pub fn render_svg(&self, spec: &ChartSpec) -> Result<String, ChartwellError> {
        let style = self.config.style();
        let mut exporter = export::svg::SvgBuilder::new()
            .with_size(Size::new(style.width(), style.height()))
            .build()?;
        Ok(exporter.export_chart(spec)?)
    }

    /// Render a chart to PNG bytes, `scale` image pixels per canvas pixel.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Export`] if the configured canvas or the
    /// scale is invalid, or rasterization fails.
    pub fn render_png(&self, spec: &ChartSpec, scale: f32) -> Result<Vec<u8>, ChartwellError> {
        let style = self.config.style();
        let exporter = export::png::PngBuilder::new()
            .with_svg(
                export::svg::SvgBuilder::new().with_size(Size::new(style.width(), style.height())),
            )
            .with_scale(scale)
            .build()?;
        Ok(exporter.export_png(spec)?)
    }

    /// Serialize a chart specification to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Export`] if serialization fails.
    pub fn render_json(&self, spec: &ChartSpec, pretty: bool) -> Result<String, ChartwellError> {
        let mut exporter = export::json::Json::new().with_pretty(pretty);
        Ok(exporter.export_chart(spec)?)
    }

    /// Build the insights prompt for `selection` over `dataset`.
    pub fn prompt(&self, dataset: &Dataset, selection: &ChartSelection) -> PromptPayload {
        insights::build_prompt(dataset, selection, &self.config.insights().prompt_options())
    }

    /// Create the HTTP client for the configured model endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Insights`] if the client cannot be created.
    pub fn language_model(&self) -> Result<HttpLanguageModel, ChartwellError> {
        Ok(HttpLanguageModel::new(self.config.insights())?)
    }

    /// Ask `model` for insights on `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Insights`] on transport or decode failures.
    pub fn insights<M>(
        &self,
        model: &M,
        payload: &PromptPayload,
    ) -> Result<InsightsResult, ChartwellError>
    where
        M: LanguageModel + ?Sized,
    {
        Ok(insights::request_insights(model, payload)?)
    }

    /// Ask `model` for a one-sentence caption.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Insights`] if the model cannot be reached.
    pub fn caption<M>(&self, model: &M, request: &CaptionRequest) -> Result<Caption, ChartwellError>
    where
        M: LanguageModel + ?Sized,
    {
        Ok(insights::request_caption(
            model,
            request,
            self.config.insights().language(),
        )?)
    }

    /// Start an interactive session styled by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChartwellError::Config`] if a configured color is invalid.
    pub fn session(&self) -> Result<Session, ChartwellError> {
        let style = self
            .config
            .style()
            .chart_style()
            .map_err(ChartwellError::Config)?;
        Ok(Session::new(style))
    }
}
