//! Error types for Chartwell operations.
//!
//! This module provides the main error type [`ChartwellError`] which wraps
//! the error conditions that can occur between reading a dataset and
//! exporting a chart.

use std::io;

use thiserror::Error;

use chartwell_core::selection::SelectionError;

use crate::{chart::NothingToRender, insights::InsightsError};

/// The main error type for Chartwell operations.
///
/// Degraded data (unparseable numbers, ragged rows) is never an error; it is
/// substituted while building the chart.
#[derive(Debug, Error)]
pub enum ChartwellError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dataset source could not be read. The current dataset is kept.
    #[error("Failed to read dataset from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selection: {0}")]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    NothingToRender(#[from] NothingToRender),

    #[error(transparent)]
    Insights(#[from] InsightsError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for ChartwellError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ChartwellError {
    /// Create a new `Read` error for the source at `path`.
    pub fn new_read_error(path: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
