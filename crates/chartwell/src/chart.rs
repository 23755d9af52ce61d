//! Chart configuration builder.
//!
//! [`build`] maps a [`Dataset`], a [`ChartSelection`], and a [`ChartStyle`]
//! onto a renderer-ready [`ChartSpec`]. The function is pure: identical
//! inputs always produce identical specifications.
//!
//! Data-shape problems degrade instead of failing. Unparseable or absent
//! fields become `0` in proportion charts (so slices still sum) and missing
//! points in bar and line charts (so the renderer draws a gap rather than a
//! false zero). The only failure is a dataset without rows.

use log::{debug, trace};
use thiserror::Error;

use chartwell_core::{color::Color, dataset::Dataset, selection::ChartSelection};

pub use chartwell_core::chart::{
    AxisStyle, ChartSpec, ChartStyle, LegendStyle, Palette, Series, SeriesColors, SeriesStyle,
    TooltipStyle,
};

/// Font size of axis tick labels.
pub const TICK_FONT_SIZE: f32 = 11.0;

/// Font size of legend labels.
pub const LEGEND_FONT_SIZE: f32 = 12.0;

/// Returned by [`build`] when the dataset has no rows to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("nothing to render: the dataset has no rows")]
pub struct NothingToRender;

/// Build the chart specification for `dataset` under `selection` and `style`.
///
/// # Errors
///
/// Returns [`NothingToRender`] when `dataset` has no rows.
///
/// # Examples
///
/// ```
/// # use chartwell::chart::{build, ChartStyle};
/// # use chartwell::selection::{ChartKind, ChartSelection};
/// # use chartwell_parser::{parse, ParseOptions};
/// let dataset = parse("a,b\n1,2\n3,x", &ParseOptions::default());
/// let selection = ChartSelection::default()
///     .with_kind(ChartKind::Line)
///     .with_series([1]);
///
/// let spec = build(&dataset, &selection, &ChartStyle::default()).unwrap();
/// assert_eq!(spec.labels(), ["1", "3"]);
/// assert_eq!(spec.series()[0].values(), [Some(2.0), None]);
/// ```
pub fn build(
    dataset: &Dataset,
    selection: &ChartSelection,
    style: &ChartStyle,
) -> Result<ChartSpec, NothingToRender> {
    if dataset.is_empty() {
        debug!("Dataset has no rows, nothing to render");
        return Err(NothingToRender);
    }

    let kind = selection.kind();
    let labels = build_labels(dataset, selection.label_column());

    let series = if kind.is_proportional() {
        vec![proportion_series(dataset, selection, style)]
    } else {
        selection
            .effective_series_columns()
            .into_iter()
            .map(|column| cartesian_series(dataset, selection, column))
            .collect()
    };

    let axes = (!kind.is_proportional()).then(|| {
        AxisStyle::new(
            style.text_color(),
            TICK_FONT_SIZE,
            Color::srgba(255, 255, 255, 0.1),
        )
    });
    let legend = LegendStyle::new(style.text_color(), LEGEND_FONT_SIZE);
    let tooltip = TooltipStyle::new(
        style.text_color(),
        style.text_color(),
        Color::srgba(0, 0, 0, 0.8),
    );

    debug!(
        kind:% = kind,
        labels = labels.len(),
        series = series.len();
        "Chart specification built"
    );

    let spec = ChartSpec::new(kind, labels, series, axes, legend, tooltip, style);
    trace!(spec:?; "Chart specification");
    Ok(spec)
}

/// One label per row from `column`; absent fields become empty strings.
fn build_labels(dataset: &Dataset, column: usize) -> Vec<String> {
    (0..dataset.row_count())
        .map(|row| {
            dataset
                .cell(row, column)
                .map(|cell| cell.raw().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// The single series of a pie or doughnut chart, one generated color per slice.
fn proportion_series(dataset: &Dataset, selection: &ChartSelection, style: &ChartStyle) -> Series {
    let column = selection.value_column();
    let values: Vec<Option<f64>> = (0..dataset.row_count())
        .map(|row| {
            let value = dataset.cell(row, column).and_then(|cell| cell.to_number());
            Some(value.unwrap_or(0.0))
        })
        .collect();

    let total = values.len();
    let colors = (0..total).map(|index| Color::generated(index, total)).collect();

    Series::new(
        dataset.column_name(column),
        values,
        SeriesColors::PerPoint(colors),
        SeriesStyle::for_kind(selection.kind(), style.background_color()),
    )
}

/// A bar or line series for `column`; unparseable fields become missing points.
fn cartesian_series(dataset: &Dataset, selection: &ChartSelection, column: usize) -> Series {
    let values = (0..dataset.row_count())
        .map(|row| dataset.cell(row, column).and_then(|cell| cell.to_number()))
        .collect();

    let color = selection
        .series_color(column)
        .unwrap_or_else(|| Color::generated(column, dataset.column_count()));

    Series::new(
        dataset.column_name(column),
        values,
        SeriesColors::Uniform(color),
        SeriesStyle::for_kind(selection.kind(), Color::default()),
    )
}
