//! Command-line argument definitions for the Chartwell CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and logging
//! verbosity; each subcommand carries its own input and output options.

use clap::{Parser, Subcommand, ValueEnum};

use chartwell::{
    color::Color,
    dataset::Dataset,
    selection::{ChartKind, ChartSelection},
};
use chartwell_parser::{Delimiter, ParseOptions};

/// Command-line arguments for the Chartwell charting tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a dataset as a chart
    Render(RenderArgs),
    /// Ask the configured language model for insights on a dataset
    Insights(InsightsArgs),
    /// Ask the configured language model for a one-sentence chart caption
    Caption(CaptionArgs),
}

/// Output format of the `render` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Svg,
    /// A PNG image rasterized from the SVG
    Png,
    /// The chart specification as JSON
    Json,
}

/// Dataset source and chart selection shared by dataset subcommands.
#[derive(clap::Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Path to the input file, or `-` for standard input
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Treat the first line as data rather than column names
    #[arg(long)]
    pub no_header: bool,

    /// Field delimiter (comma, semicolon, tab, pipe, auto)
    #[arg(short, long, default_value = "comma")]
    pub delimiter: Delimiter,

    /// Chart kind (bar, line, pie, doughnut)
    #[arg(short, long, default_value = "line")]
    pub kind: ChartKind,

    /// Column index supplying the category labels
    #[arg(long)]
    pub label: Option<usize>,

    /// Column index plotted when no series are given
    #[arg(long)]
    pub value: Option<usize>,

    /// Column indices plotted as series, comma separated
    #[arg(long, value_delimiter = ',')]
    pub series: Vec<usize>,

    /// Series color override as `COLUMN=COLOR`, repeatable
    #[arg(long = "color", value_parser = parse_series_color)]
    pub colors: Vec<(usize, Color)>,
}

impl DatasetArgs {
    /// Creates arguments for `input` with every option at its default.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            no_header: false,
            delimiter: Delimiter::Comma,
            kind: ChartKind::Line,
            label: None,
            value: None,
            series: Vec::new(),
            colors: Vec::new(),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(!self.no_header, self.delimiter)
    }

    /// The selection requested on the command line, starting from the
    /// defaults for `dataset`.
    pub fn selection(&self, dataset: &Dataset) -> ChartSelection {
        let mut selection = ChartSelection::for_dataset(dataset, self.kind)
            .with_series(self.series.iter().copied());
        if let Some(label) = self.label {
            selection = selection.with_label_column(label);
        }
        if let Some(value) = self.value {
            selection = selection.with_value_column(value);
        }
        for (column, color) in &self.colors {
            selection = selection.with_series_color(*column, *color);
        }
        selection
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    pub format: Format,

    /// Image pixels per canvas pixel for PNG output
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,
}

#[derive(clap::Args, Debug, Clone)]
pub struct InsightsArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Also export the chart as SVG to this path before asking for insights
    #[arg(long)]
    pub chart: Option<String>,

    /// Print the request payload instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CaptionArgs {
    /// Chart kind (bar, line, pie, doughnut)
    #[arg(short, long, default_value = "line")]
    pub kind: ChartKind,

    /// Chart title
    #[arg(long)]
    pub title: String,

    /// Short description of what the chart shows
    #[arg(long, default_value = "")]
    pub description: String,

    /// Print the prompt instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Parses a `COLUMN=COLOR` pair.
fn parse_series_color(value: &str) -> Result<(usize, Color), String> {
    let (column, color) = value
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=COLOR, got `{value}`"))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid column `{column}`: {err}"))?;
    Ok((column, Color::new(color.trim())?))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let args = Args::parse_from([
            "chartwell",
            "render",
            "data.csv",
            "--kind",
            "bar",
            "--series",
            "1,3",
            "--color",
            "3=#ff0000",
            "-d",
            "semicolon",
            "--format",
            "json",
            "--log-level",
            "off",
        ]);

        let Command::Render(render) = args.command else {
            panic!("Expected render command");
        };
        assert_eq!(args.log_level, "off");
        assert_eq!(render.format, Format::Json);
        assert_eq!(render.dataset.kind, ChartKind::Bar);
        assert_eq!(render.dataset.series, [1, 3]);
        assert_eq!(render.dataset.delimiter, Delimiter::Semicolon);
        assert_eq!(render.dataset.colors[0].0, 3);
    }

    #[test]
    fn test_png_format_with_scale() {
        let args = Args::parse_from([
            "chartwell", "render", "data.csv", "-f", "png", "--scale", "2", "-o", "chart.png",
        ]);

        let Command::Render(render) = args.command else {
            panic!("Expected render command");
        };
        assert_eq!(render.format, Format::Png);
        assert_eq!(render.scale, 2.0);
        assert_eq!(render.output, "chart.png");
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Args::try_parse_from(["chartwell", "render", "x.csv", "--kind", "radar"]).is_err());
    }

    #[test]
    fn test_parse_series_color() {
        let (column, color) = parse_series_color("2 = blue").unwrap();
        assert_eq!(column, 2);
        assert_eq!(color, Color::new("blue").unwrap());

        assert!(parse_series_color("blue").is_err());
        assert!(parse_series_color("x=blue").is_err());
        assert!(parse_series_color("1=not-a-color").is_err());
    }

    #[test]
    fn test_selection_from_arguments() {
        let dataset = chartwell_parser::parse("a,b,c\n1,2,3", &ParseOptions::default());
        let mut args = DatasetArgs::new("data.csv");
        args.kind = ChartKind::Bar;
        args.label = Some(2);
        args.series = vec![0, 1];

        let selection = args.selection(&dataset);

        assert_eq!(selection.kind(), ChartKind::Bar);
        assert_eq!(selection.label_column(), 2);
        assert_eq!(selection.value_column(), 1);
        assert_eq!(selection.effective_series_columns(), [0, 1]);
    }

    #[test]
    fn test_no_header_flag() {
        let mut args = DatasetArgs::new("-");
        args.no_header = true;
        assert!(!args.parse_options().has_header_row());
    }
}
