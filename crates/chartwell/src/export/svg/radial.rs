//! SVG rendering for pie and doughnut charts.

use std::f32::consts::{PI, TAU};

use log::debug;
use svg::node::element as svg_element;

use chartwell_core::{
    chart::ChartSpec,
    geometry::{Bounds, Point},
    selection::ChartKind,
};

use super::{
    Svg,
    layer::{LayeredOutput, RenderLayer},
    paint, tooltip,
};

/// Inner radius of a doughnut as a share of its outer radius.
const DOUGHNUT_CUTOUT: f32 = 0.5;
/// Gap between the outer radius and the plot edge.
const SLICE_MARGIN: f32 = 4.0;

impl Svg {
    /// Renders the slices of the first series around the plot center.
    pub(super) fn render_radial(&self, spec: &ChartSpec, plot: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(series) = spec.series().first() else {
            return output;
        };

        let center = plot.center();
        let outer = (plot.width().min(plot.height()) / 2.0 - SLICE_MARGIN).max(0.0);
        let inner = if spec.kind() == ChartKind::Doughnut {
            outer * DOUGHNUT_CUTOUT
        } else {
            0.0
        };

        let fractions = slice_fractions(series.values());
        if fractions.iter().all(|fraction| *fraction <= 0.0) {
            debug!("No positive values, slices omitted");
            return output;
        }

        let mut start = 0.0f32;
        for (index, fraction) in fractions.iter().enumerate() {
            if *fraction <= 0.0 {
                continue;
            }
            let end = start + fraction * TAU;
            let (fill, fill_opacity) = paint(series.fill_color(index));
            let (stroke, stroke_opacity) = paint(series.border_color(index));
            let label = spec.labels().get(index).map_or("", String::as_str);
            let value = series.values()[index].unwrap_or(0.0);
            let text = format!("{label}: {value} ({:.1}%)", fraction * 100.0);

            for d in slice_paths(center, outer, inner, start, end) {
                let slice = svg_element::Path::new()
                    .set("d", d)
                    .set("fill", fill.as_str())
                    .set("fill-opacity", fill_opacity)
                    .set("stroke", stroke.as_str())
                    .set("stroke-opacity", stroke_opacity)
                    .set("stroke-width", series.style().border_width())
                    .add(tooltip(&text));
                output.add_to_layer(RenderLayer::Series, Box::new(slice));
            }
            start = end;
        }
        output
    }
}

/// Share of the whole taken by each value.
///
/// Missing and negative values take no share. When nothing is positive
/// every share is zero.
pub(super) fn slice_fractions(values: &[Option<f64>]) -> Vec<f32> {
    let positive = |value: &Option<f64>| value.filter(|v| *v > 0.0).unwrap_or(0.0);
    let total: f64 = values.iter().map(positive).sum();
    if total <= 0.0 {
        return vec![0.0; values.len()];
    }
    values
        .iter()
        .map(|value| (positive(value) / total) as f32)
        .collect()
}

/// Paths covering the slice from `start` to `end` (radians, clockwise from
/// twelve o'clock). A full turn is split in two, since an SVG arc cannot
/// start and end at the same point.
fn slice_paths(center: Point, outer: f32, inner: f32, start: f32, end: f32) -> Vec<String> {
    if end - start >= TAU - 1e-4 {
        let middle = start + (end - start) / 2.0;
        return vec![
            slice_path(center, outer, inner, start, middle),
            slice_path(center, outer, inner, middle, end),
        ];
    }
    vec![slice_path(center, outer, inner, start, end)]
}

fn slice_path(center: Point, outer: f32, inner: f32, start: f32, end: f32) -> String {
    let large_arc = u8::from(end - start > PI);
    let outer_start = center.polar_offset(outer, start);
    let outer_end = center.polar_offset(outer, end);

    if inner <= 0.0 {
        return format!(
            "M {} {} L {} {} A {outer} {outer} 0 {large_arc} 1 {} {} Z",
            center.x(),
            center.y(),
            outer_start.x(),
            outer_start.y(),
            outer_end.x(),
            outer_end.y()
        );
    }

    let inner_end = center.polar_offset(inner, end);
    let inner_start = center.polar_offset(inner, start);
    format!(
        "M {} {} A {outer} {outer} 0 {large_arc} 1 {} {} L {} {} A {inner} {inner} 0 {large_arc} 0 {} {} Z",
        outer_start.x(),
        outer_start.y(),
        outer_end.x(),
        outer_end.y(),
        inner_end.x(),
        inner_end.y(),
        inner_start.x(),
        inner_start.y()
    )
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_fractions_sum_to_one() {
        let fractions = slice_fractions(&[Some(2.0), Some(4.0), Some(2.0)]);

        assert!(approx_eq!(f32, fractions.iter().sum::<f32>(), 1.0, ulps = 4));
        assert!(approx_eq!(f32, fractions[1], 0.5, ulps = 2));
    }

    #[test]
    fn test_fractions_ignore_missing_and_negative() {
        let fractions = slice_fractions(&[Some(3.0), None, Some(-5.0), Some(1.0)]);

        assert_eq!(fractions[1], 0.0);
        assert_eq!(fractions[2], 0.0);
        assert!(approx_eq!(f32, fractions[0], 0.75, ulps = 2));
    }

    #[test]
    fn test_fractions_all_zero() {
        assert_eq!(slice_fractions(&[Some(0.0), Some(0.0)]), [0.0, 0.0]);
        assert!(slice_fractions(&[]).is_empty());
    }

    #[test]
    fn test_full_turn_is_split() {
        let center = Point::new(50.0, 50.0);

        assert_eq!(slice_paths(center, 40.0, 0.0, 0.0, TAU).len(), 2);
        assert_eq!(slice_paths(center, 40.0, 0.0, 0.0, PI).len(), 1);
    }

    #[test]
    fn test_pie_slice_starts_at_center() {
        let path = slice_path(Point::new(50.0, 50.0), 40.0, 0.0, 0.0, PI / 2.0);

        assert!(path.starts_with("M 50 50 L 50 10 A 40 40 0 0 1 "));
        assert!(path.ends_with(" Z"));
    }

    #[test]
    fn test_doughnut_slice_has_two_arcs() {
        let path = slice_path(Point::new(50.0, 50.0), 40.0, 20.0, 0.0, 3.0 * PI / 2.0);

        assert_eq!(path.matches(" A ").count(), 2);
        assert!(path.contains("A 40 40 0 1 1 "));
        assert!(path.contains("A 20 20 0 1 0 "));
    }
}
