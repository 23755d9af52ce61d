//! SVG rendering for bar and line charts.

use log::trace;
use svg::node::element as svg_element;

use chartwell_core::{
    chart::{AxisStyle, ChartSpec, Series},
    geometry::{Bounds, Insets, Point},
    selection::ChartKind,
};

use super::{
    Svg,
    layer::{LayeredOutput, RenderLayer},
    paint, tooltip,
};

/// Horizontal space reserved left of the plot for value labels.
const VALUE_LABEL_WIDTH: f32 = 48.0;
/// Vertical space reserved below the plot for category labels.
const CATEGORY_LABEL_HEIGHT: f32 = 24.0;
/// Approximate number of intervals on the value axis.
const TARGET_TICKS: f64 = 5.0;
/// Share of a category band covered by its bars.
const BAR_GROUP_WIDTH: f32 = 0.8;
/// Minimum horizontal distance between category labels.
const MIN_LABEL_SPACING: f32 = 48.0;
/// Largest magnitude the value axis spans. Keeps tick arithmetic finite.
const VALUE_LIMIT: f64 = 1e300;

/// Linear mapping from data values onto the plot's vertical extent.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ValueScale {
    min: f64,
    max: f64,
    step: f64,
}

impl ValueScale {
    /// Covers every finite value and zero, widened to whole tick steps.
    pub(super) fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .filter(|value| value.is_finite())
            .map(|value| value.clamp(-VALUE_LIMIT, VALUE_LIMIT))
            .fold((0.0f64, 0.0f64), |(lo, hi), value| (lo.min(value), hi.max(value)));
        let hi = if hi - lo <= f64::EPSILON { lo + 1.0 } else { hi };

        let step = nice_step((hi - lo) / TARGET_TICKS);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    pub(super) fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| {
                let tick = self.min + i as f64 * self.step;
                // Collapse float noise around zero.
                if tick.abs() < self.step * 1e-9 { 0.0 } else { tick }
            })
            .collect()
    }

    /// Vertical position of `value` inside `plot`. Values beyond the axis
    /// are pinned to its ends.
    pub(super) fn y(&self, value: f64, plot: Bounds) -> f32 {
        let fraction = (value.clamp(self.min, self.max) - self.min) / (self.max - self.min);
        plot.max_y() - fraction as f32 * plot.height()
    }

    /// Formats a tick label with as many decimals as the step needs.
    pub(super) fn format_tick(&self, tick: f64) -> String {
        let decimals = (-self.step.log10().floor()).max(0.0) as usize;
        format!("{tick:.decimals$}")
    }
}

/// Rounds `raw` up to 1, 2, or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Equal-width category bands across the plot.
#[derive(Debug, Clone, Copy)]
struct Bands {
    min_x: f32,
    width: f32,
}

impl Bands {
    fn new(plot: Bounds, count: usize) -> Self {
        Self {
            min_x: plot.min_x(),
            width: plot.width() / count.max(1) as f32,
        }
    }

    fn center(&self, index: usize) -> f32 {
        self.min_x + self.width * (index as f32 + 0.5)
    }
}

impl Svg {
    /// Renders axes, grid, and series of a bar or line chart inside `plot`.
    pub(super) fn render_cartesian(&self, spec: &ChartSpec, plot: Bounds) -> LayeredOutput {
        let plot = plot.shrink(Insets::new(0.0, 0.0, CATEGORY_LABEL_HEIGHT, VALUE_LABEL_WIDTH));
        let scale = ValueScale::from_values(
            spec.series()
                .iter()
                .flat_map(|series| series.values().iter().flatten().copied()),
        );
        let bands = Bands::new(plot, spec.labels().len());
        trace!(scale:?, plot:?; "Cartesian layout");

        let mut output = LayeredOutput::new();
        if let Some(axes) = spec.axes() {
            output.merge(self.render_value_axis(axes, plot, &scale));
            output.merge(self.render_category_axis(axes, plot, &bands, spec.labels()));
        }

        let series_count = spec.series().len();
        for (index, series) in spec.series().iter().enumerate() {
            let rendered = match spec.kind() {
                ChartKind::Line => self.render_line(series, spec.labels(), plot, &bands, &scale),
                _ => self.render_bars(series, spec.labels(), (index, series_count), plot, &bands, &scale),
            };
            output.merge(rendered);
        }
        output
    }

    fn render_value_axis(&self, axes: &AxisStyle, plot: Bounds, scale: &ValueScale) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let (grid, grid_opacity) = paint(axes.grid_color());

        for tick in scale.ticks() {
            let y = scale.y(tick, plot);
            let line = svg_element::Line::new()
                .set("x1", plot.min_x())
                .set("y1", y)
                .set("x2", plot.max_x())
                .set("y2", y)
                .set("stroke", grid.as_str())
                .set("stroke-opacity", grid_opacity)
                .set("stroke-width", 1);
            output.add_to_layer(RenderLayer::Grid, Box::new(line));

            let label = self.text(
                &scale.format_tick(tick),
                Point::new(plot.min_x() - 6.0, y),
                axes.tick_font_size(),
                axes.tick_color(),
                "end",
            );
            output.add_to_layer(RenderLayer::Text, Box::new(label));
        }
        output
    }

    fn render_category_axis(
        &self,
        axes: &AxisStyle,
        plot: Bounds,
        bands: &Bands,
        labels: &[String],
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        // Thin out labels that would overlap.
        let every = (MIN_LABEL_SPACING / bands.width.max(f32::EPSILON)).ceil().max(1.0) as usize;

        for (index, label) in labels.iter().enumerate().step_by(every) {
            let text = self.text(
                label,
                Point::new(bands.center(index), plot.max_y() + CATEGORY_LABEL_HEIGHT / 2.0),
                axes.tick_font_size(),
                axes.tick_color(),
                "middle",
            );
            output.add_to_layer(RenderLayer::Text, Box::new(text));
        }
        output
    }

    /// Renders one bar series; `slot` is the series index and the number of
    /// series sharing each band.
    fn render_bars(
        &self,
        series: &Series,
        labels: &[String],
        slot: (usize, usize),
        plot: Bounds,
        bands: &Bands,
        scale: &ValueScale,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let (slot_index, slot_count) = slot;
        let group_width = bands.width * BAR_GROUP_WIDTH;
        let bar_width = group_width / slot_count.max(1) as f32;
        let baseline = scale.y(0.0, plot);

        for (index, value) in series.values().iter().enumerate() {
            // Missing values leave an empty slot.
            let Some(value) = value else { continue };
            let top = scale.y(*value, plot);
            let x = bands.center(index) - group_width / 2.0 + bar_width * slot_index as f32;

            let (fill, fill_opacity) = paint(series.fill_color(index));
            let (stroke, stroke_opacity) = paint(series.border_color(index));
            let bar = svg_element::Rectangle::new()
                .set("x", x)
                .set("y", top.min(baseline))
                .set("width", bar_width)
                .set("height", (baseline - top).abs())
                .set("fill", fill)
                .set("fill-opacity", fill_opacity)
                .set("stroke", stroke)
                .set("stroke-opacity", stroke_opacity)
                .set("stroke-width", series.style().border_width())
                .add(tooltip(&point_tooltip(labels, index, series.name(), *value)));
            output.add_to_layer(RenderLayer::Series, Box::new(bar));
        }
        output
    }

    fn render_line(
        &self,
        series: &Series,
        labels: &[String],
        plot: Bounds,
        bands: &Bands,
        scale: &ValueScale,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let style = series.style();
        let points: Vec<Option<Point>> = series
            .values()
            .iter()
            .enumerate()
            .map(|(index, value)| value.map(|value| Point::new(bands.center(index), scale.y(value, plot))))
            .collect();

        let (stroke, stroke_opacity) = paint(series.border_color(0));
        let baseline = scale.y(0.0, plot);

        for segment in segments(&points) {
            if segment.len() < 2 {
                continue;
            }
            let path = curve_path(&segment, style.tension());

            if style.fill_area() {
                let (fill, fill_opacity) = paint(series.fill_color(0));
                let first = segment[0];
                let last = segment[segment.len() - 1];
                let area = svg_element::Path::new()
                    .set(
                        "d",
                        format!(
                            "{path} L {} {baseline} L {} {baseline} Z",
                            last.x(),
                            first.x()
                        ),
                    )
                    .set("fill", fill)
                    .set("fill-opacity", fill_opacity)
                    .set("stroke", "none");
                output.add_to_layer(RenderLayer::Area, Box::new(area));
            }

            let line = svg_element::Path::new()
                .set("d", path)
                .set("fill", "none")
                .set("stroke", stroke.as_str())
                .set("stroke-opacity", stroke_opacity)
                .set("stroke-width", style.border_width())
                .set("stroke-linejoin", "round");
            output.add_to_layer(RenderLayer::Series, Box::new(line));
        }

        // Markers also carry the tooltip, so isolated points stay visible.
        let radius = style.point_radius().max(2.0);
        for (index, point) in points.iter().enumerate() {
            let (Some(point), Some(value)) = (point, series.values()[index]) else {
                continue;
            };
            let (fill, fill_opacity) = paint(series.colors().at(index));
            let marker = svg_element::Circle::new()
                .set("cx", point.x())
                .set("cy", point.y())
                .set("r", radius)
                .set("fill", fill)
                .set("fill-opacity", if style.point_radius() > 0.0 { fill_opacity } else { 0.0 })
                .set("stroke", stroke.as_str())
                .set("stroke-opacity", stroke_opacity)
                .set("stroke-width", 1)
                .add(tooltip(&point_tooltip(labels, index, series.name(), value)));
            output.add_to_layer(RenderLayer::Marker, Box::new(marker));
        }
        output
    }
}

fn point_tooltip(labels: &[String], index: usize, name: &str, value: f64) -> String {
    let label = labels.get(index).map_or("", String::as_str);
    format!("{label}\n{name}: {value}")
}

/// Splits points into runs of consecutive present points.
fn segments(points: &[Option<Point>]) -> Vec<Vec<Point>> {
    points
        .split(Option::is_none)
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().flatten().copied().collect())
        .collect()
}

/// Path through `points`; cubic Bézier segments when `tension` is positive.
///
/// Control points follow the cardinal-spline construction: each tangent is
/// parallel to the line joining the neighbouring points, scaled by `tension`.
fn curve_path(points: &[Point], tension: f32) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut path = format!("M {} {}", first.x(), first.y());
    let last = points.len() - 1;

    for i in 0..last {
        let p1 = points[i];
        let p2 = points[i + 1];
        if tension <= 0.0 {
            path.push_str(&format!(" L {} {}", p2.x(), p2.y()));
            continue;
        }
        let p0 = points[i.saturating_sub(1)];
        let p3 = points[(i + 2).min(last)];
        let c1 = p1.add_point(p2.sub_point(p0).scale(tension / 2.0));
        let c2 = p2.sub_point(p3.sub_point(p1).scale(tension / 2.0));
        path.push_str(&format!(
            " C {} {} {} {} {} {}",
            c1.x(),
            c1.y(),
            c2.x(),
            c2.y(),
            p2.x(),
            p2.y()
        ));
    }
    path
}
