//! Legend layout and rendering.

use svg::node::element as svg_element;

use chartwell_core::{
    chart::{ChartSpec, LegendStyle},
    color::Color,
    geometry::{Bounds, Point},
};

use super::{
    Svg,
    layer::{LayeredOutput, RenderLayer},
    paint,
};

const SWATCH_SIZE: f32 = 12.0;
const SWATCH_GAP: f32 = 6.0;
const ENTRY_GAP: f32 = 16.0;
const ROW_GAP: f32 = 8.0;
/// Average glyph width as a share of the font size.
const GLYPH_WIDTH: f32 = 0.6;

/// One legend item.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct LegendEntry {
    label: String,
    color: Color,
}

/// Legend items for `spec`: one per slice for proportion charts, one per
/// series otherwise.
pub(super) fn legend_entries(spec: &ChartSpec) -> Vec<LegendEntry> {
    if spec.kind().is_proportional() {
        let Some(series) = spec.series().first() else {
            return Vec::new();
        };
        spec.labels()
            .iter()
            .enumerate()
            .map(|(index, label)| LegendEntry {
                label: label.clone(),
                color: series.colors().at(index),
            })
            .collect()
    } else {
        spec.series()
            .iter()
            .map(|series| LegendEntry {
                label: series.name().to_string(),
                color: series.colors().at(0),
            })
            .collect()
    }
}

/// Positions entries in centered rows no wider than `width`.
///
/// Returns each entry's top-left offset relative to the legend origin and
/// the total legend height.
fn layout_entries(entries: &[LegendEntry], width: f32, font_size: f32) -> (Vec<Point>, f32) {
    if entries.is_empty() {
        return (Vec::new(), 0.0);
    }

    let row_height = SWATCH_SIZE.max(font_size) + ROW_GAP;
    let entry_width = |entry: &LegendEntry| {
        SWATCH_SIZE + SWATCH_GAP + entry.label.chars().count() as f32 * font_size * GLYPH_WIDTH
    };

    // Greedy wrap: each row holds (first index, entry count, used width).
    let mut rows: Vec<(usize, usize, f32)> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let needed = entry_width(entry);
        match rows.last_mut() {
            Some((_, count, used)) if *used + ENTRY_GAP + needed <= width => {
                *count += 1;
                *used += ENTRY_GAP + needed;
            }
            _ => rows.push((index, 1, needed)),
        }
    }

    let mut positions = Vec::with_capacity(entries.len());
    for (row, (first, count, used)) in rows.iter().enumerate() {
        let mut x = ((width - used) / 2.0).max(0.0);
        let y = row as f32 * row_height;
        for entry in &entries[*first..*first + *count] {
            positions.push(Point::new(x, y));
            x += entry_width(entry) + ENTRY_GAP;
        }
    }

    (positions, rows.len() as f32 * row_height)
}

impl Svg {
    /// Renders the legend along the top of `area`.
    ///
    /// Returns the rendered nodes and the height taken from `area`.
    pub(super) fn render_legend(
        &self,
        entries: &[LegendEntry],
        area: Bounds,
        style: &LegendStyle,
    ) -> (LayeredOutput, f32) {
        let mut output = LayeredOutput::new();
        let (positions, height) = layout_entries(entries, area.width(), style.font_size());
        let origin = Point::new(area.min_x(), area.min_y());
        let row_height = SWATCH_SIZE.max(style.font_size());

        for (entry, offset) in entries.iter().zip(positions) {
            let top_left = origin.add_point(offset);
            let (fill, opacity) = paint(entry.color);
            let swatch = svg_element::Rectangle::new()
                .set("x", top_left.x())
                .set("y", top_left.y() + (row_height - SWATCH_SIZE) / 2.0)
                .set("width", SWATCH_SIZE)
                .set("height", SWATCH_SIZE)
                .set("rx", 2)
                .set("fill", fill)
                .set("fill-opacity", opacity);
            output.add_to_layer(RenderLayer::Legend, Box::new(swatch));

            let label = self.text(
                &entry.label,
                Point::new(
                    top_left.x() + SWATCH_SIZE + SWATCH_GAP,
                    top_left.y() + row_height / 2.0,
                ),
                style.font_size(),
                style.label_color(),
                "start",
            );
            output.add_to_layer(RenderLayer::Legend, Box::new(label));
        }

        (output, height)
    }
}

#[cfg(test)]
mod tests {
    use chartwell_core::{
        chart::ChartStyle,
        selection::{ChartKind, ChartSelection},
    };
    use chartwell_parser::{ParseOptions, parse};

    use super::*;
    use crate::chart::build;

    fn entry(label: &str) -> LegendEntry {
        LegendEntry {
            label: label.to_string(),
            color: Color::default(),
        }
    }

    fn spec(text: &str, selection: ChartSelection) -> ChartSpec {
        let dataset = parse(text, &ParseOptions::default());
        build(&dataset, &selection, &ChartStyle::default()).unwrap()
    }

    #[test]
    fn test_entries_per_series() {
        let spec = spec(
            "k,v,w\na,1,2\nb,3,4",
            ChartSelection::default().with_kind(ChartKind::Bar).with_series([1, 2]),
        );

        let labels: Vec<_> = legend_entries(&spec).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["v", "w"]);
    }

    #[test]
    fn test_entries_per_slice() {
        let spec = spec(
            "k,v\na,1\nb,3\nc,5",
            ChartSelection::default().with_kind(ChartKind::Doughnut).with_value_column(1),
        );

        let entries = legend_entries(&spec);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].label, "c");
        assert_eq!(entries[2].color, Color::generated(2, 3));
    }

    #[test]
    fn test_layout_single_row_is_centered() {
        let (positions, height) = layout_entries(&[entry("a"), entry("b")], 400.0, 12.0);

        assert_eq!(positions.len(), 2);
        assert!(positions[0].x() > 0.0);
        assert_eq!(positions[0].y(), positions[1].y());
        assert!(height > 0.0);
    }

    #[test]
    fn test_layout_wraps_rows() {
        let entries: Vec<_> = (0..20).map(|i| entry(&format!("series number {i}"))).collect();

        let (positions, height) = layout_entries(&entries, 300.0, 12.0);
        let (_, single_row) = layout_entries(&entries[..1], 300.0, 12.0);

        assert_eq!(positions.len(), 20);
        assert!(height > single_row);
        assert!(positions.iter().all(|p| p.x() >= 0.0 && p.x() < 300.0));
    }

    #[test]
    fn test_layout_empty() {
        assert_eq!(layout_entries(&[], 300.0, 12.0), (Vec::new(), 0.0));
    }
}
