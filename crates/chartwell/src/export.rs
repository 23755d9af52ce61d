//! Export functionality for Chartwell charts.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a [`ChartSpec`] into an output document. It is the final stage
//! of the Chartwell pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Delimited Text
//!     ↓ parse
//! Dataset + ChartSelection
//!     ↓ build
//! ChartSpec
//!     ↓ export (this module)
//! Output Document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - Static SVG chart via [`svg::SvgBuilder`] and [`svg::Svg`]
//! - [`png`] - Raster image of the SVG chart via [`png::PngBuilder`]. PNG
//!   output is binary, so [`png::Png`] has its own
//!   [`export_png`](png::Png::export_png) instead of implementing [`Exporter`]
//! - [`json`] - The chart specification itself as JSON, for external
//!   charting engines
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`ChartwellError::Export`] at the crate boundary.
//!
//! [`ChartwellError::Export`]: crate::ChartwellError::Export

pub mod json;
pub mod png;
pub mod svg;

use chartwell_core::chart::ChartSpec;

/// Abstraction for chart export backends.
pub trait Exporter {
    /// Exports a chart specification to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the chart cannot be converted to the
    /// target format, or [`Error::Serialize`] if encoding the output fails.
    fn export_chart(&mut self, spec: &ChartSpec) -> Result<String, Error>;
}

/// Errors that can occur during chart export.
#[derive(Debug)]
pub enum Error {
    /// A rendering failure described by `message`.
    Render(String),
    /// The output document could not be encoded.
    Serialize(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Serialize(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Serialize(err) => Some(err),
        }
    }
}
