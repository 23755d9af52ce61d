//! Error adapter for converting ChartwellError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every error gets a
//! stable code and, where the user can act on it, a help message.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use chartwell::{ChartwellError, insights::InsightsError};

/// Adapter for a [`ChartwellError`].
pub struct ErrorAdapter<'a>(pub &'a ChartwellError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ChartwellError::Io(_) => "chartwell::io",
            ChartwellError::Read { .. } => "chartwell::read",
            ChartwellError::Config(_) => "chartwell::config",
            ChartwellError::Selection(_) => "chartwell::selection",
            ChartwellError::NothingToRender(_) => "chartwell::empty",
            ChartwellError::Insights(InsightsError::Transport(_)) => {
                "chartwell::insights::transport"
            }
            ChartwellError::Insights(InsightsError::Decode(_)) => "chartwell::insights::decode",
            ChartwellError::Export(_) => "chartwell::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ChartwellError::Read { .. } => "check that the file exists and is readable",
            ChartwellError::Config(_) => "check the configuration file passed with --config",
            ChartwellError::Selection(_) => "column indices start at 0",
            ChartwellError::NothingToRender(_) => {
                "the dataset has no data rows; check the --delimiter and --no-header options"
            }
            ChartwellError::Insights(InsightsError::Transport(_)) => {
                "check insights.endpoint and the environment variable named by insights.api_key_env"
            }
            ChartwellError::Insights(InsightsError::Decode(_)) => {
                "the model reply was not in the expected format; try again"
            }
            ChartwellError::Io(_) | ChartwellError::Export(_) => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap `err` for rendering by a miette report handler.
pub fn to_reportable(err: &ChartwellError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use std::io;

    use chartwell::{chart::NothingToRender, selection::SelectionError};

    use super::*;

    fn code(err: &ChartwellError) -> String {
        to_reportable(err).code().unwrap().to_string()
    }

    #[test]
    fn test_read_error() {
        let err = ChartwellError::new_read_error(
            "sales.csv",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let reportable = to_reportable(&err);

        assert_eq!(code(&err), "chartwell::read");
        assert!(reportable.help().is_some());
        assert_eq!(
            reportable.to_string(),
            "Failed to read dataset from sales.csv: missing"
        );
    }

    #[test]
    fn test_insights_codes() {
        let transport = ChartwellError::Insights(InsightsError::Transport("refused".to_string()));
        let decode = ChartwellError::Insights(InsightsError::Decode("not json".to_string()));

        assert_eq!(code(&transport), "chartwell::insights::transport");
        assert_eq!(code(&decode), "chartwell::insights::decode");
    }

    #[test]
    fn test_nothing_to_render() {
        let err = ChartwellError::from(NothingToRender);

        assert_eq!(code(&err), "chartwell::empty");
        assert!(to_reportable(&err).help().is_some());
    }

    #[test]
    fn test_selection_error_message() {
        let err = ChartwellError::from(SelectionError::ColumnOutOfRange {
            role: "label",
            index: 4,
            column_count: 2,
        });

        assert_eq!(code(&err), "chartwell::selection");
        assert!(to_reportable(&err).to_string().starts_with("Invalid selection"));
    }

    #[test]
    fn test_source_is_forwarded() {
        let err = ChartwellError::new_read_error("x", io::Error::other("boom"));
        let reportable = to_reportable(&err);

        let source = std::error::Error::source(&reportable).unwrap();
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = ChartwellError::Config("bad".to_string());
        let mut out = String::new();

        miette::GraphicalReportHandler::new()
            .render_report(&mut out, &to_reportable(&err))
            .unwrap();

        assert!(out.contains("chartwell::config"));
        assert!(out.contains("bad"));
    }
}
