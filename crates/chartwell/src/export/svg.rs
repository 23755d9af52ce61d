//! SVG export backend.
//!
//! Renders a [`ChartSpec`] to a static SVG document. Bar and line charts are
//! drawn on a value axis with horizontal grid lines; pie and doughnut charts
//! are drawn as slices around the plot center. A legend runs along the top.
//! Tooltip text is attached to every data mark as a native SVG `<title>`.
//!
//! # Example
//!
//! ```
//! # use chartwell::chart::{build, ChartStyle};
//! # use chartwell::export::{Exporter, svg::SvgBuilder};
//! # use chartwell::selection::{ChartKind, ChartSelection};
//! # use chartwell_parser::{parse, ParseOptions};
//! let dataset = parse("k,v\na,1\nb,3", &ParseOptions::default());
//! let selection = ChartSelection::for_dataset(&dataset, ChartKind::Bar);
//! let spec = build(&dataset, &selection, &ChartStyle::default()).unwrap();
//!
//! let mut svg = SvgBuilder::new().build().unwrap();
//! let document = svg.export_chart(&spec).unwrap();
//! assert!(document.starts_with("<svg"));
//! ```

mod cartesian;
mod layer;
mod legend;
mod radial;

use log::{debug, info};
use svg::{
    Node,
    node::{Text as SvgText, element as svg_element},
};

use chartwell_core::{
    chart::ChartSpec,
    color::Color,
    geometry::{Bounds, Insets, Point, Size},
};

use super::{Error, Exporter};
use layer::{LayeredOutput, RenderLayer};

/// Builder for [`Svg`] exporters.
#[derive(Debug, Clone)]
pub struct SvgBuilder {
    size: Size,
    padding: Insets,
    font_family: String,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self {
            size: Size::new(800.0, 450.0),
            padding: Insets::uniform(16.0),
            font_family: "sans-serif".to_string(),
        }
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the canvas size in pixels.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Sets the space kept clear around the chart.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_font_family(mut self, font_family: impl Into<String>) -> Self {
        self.font_family = font_family.into();
        self
    }

    /// Builds the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the canvas size is not positive and finite.
    pub fn build(self) -> Result<Svg, Error> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.size.width()) || !valid(self.size.height()) {
            return Err(Error::Render(format!(
                "canvas size must be positive, got {}x{}",
                self.size.width(),
                self.size.height()
            )));
        }

        Ok(Svg {
            size: self.size,
            padding: self.padding,
            font_family: self.font_family,
        })
    }
}

/// SVG exporter for chart specifications.
#[derive(Debug, Clone)]
pub struct Svg {
    size: Size,
    padding: Insets,
    font_family: String,
}

impl Svg {
    /// Returns the canvas size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Renders `spec` to an SVG document.
    pub fn render_chart(&self, spec: &ChartSpec) -> svg::Document {
        let canvas = Bounds::new_from_top_left(Point::default(), self.size);
        let content = canvas.shrink(self.padding);

        let entries = legend::legend_entries(spec);
        let (legend_output, legend_height) = self.render_legend(&entries, content, spec.legend());
        let plot = content.shrink(Insets::new(legend_height, 0.0, 0.0, 0.0));
        debug!(
            legend_entries = entries.len(),
            plot_width = plot.width(),
            plot_height = plot.height();
            "Chart layout computed"
        );

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Background, Box::new(self.render_background(spec)));
        output.merge(legend_output);
        if spec.kind().is_proportional() {
            output.merge(self.render_radial(spec, plot));
        } else {
            output.merge(self.render_cartesian(spec, plot));
        }

        output.render().into_iter().fold(
            svg::Document::new()
                .set(
                    "viewBox",
                    format!("0 0 {} {}", self.size.width(), self.size.height()),
                )
                .set("width", self.size.width())
                .set("height", self.size.height()),
            |doc, node| doc.add(node),
        )
    }

    fn render_background(&self, spec: &ChartSpec) -> svg_element::Rectangle {
        let (fill, opacity) = paint(spec.background());
        svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", self.size.width())
            .set("height", self.size.height())
            .set("fill", fill)
            .set("fill-opacity", opacity)
    }

    /// Creates a single-line text element anchored at `position`.
    fn text(
        &self,
        content: &str,
        position: Point,
        font_size: f32,
        color: Color,
        anchor: &str,
    ) -> svg_element::Text {
        let (fill, opacity) = paint(color);
        svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", anchor)
            .set("dominant-baseline", "central")
            .set("font-family", self.font_family.as_str())
            .set("font-size", font_size)
            .set("fill", fill)
            .set("fill-opacity", opacity)
            .add(SvgText::new(content))
    }
}

impl Exporter for Svg {
    fn export_chart(&mut self, spec: &ChartSpec) -> Result<String, Error> {
        info!(kind:% = spec.kind(), series = spec.series().len(); "Rendering SVG chart");
        let document = self.render_chart(spec);
        Ok(document.to_string())
    }
}

/// Splits `color` into an opaque paint value and its opacity.
fn paint(color: Color) -> (String, f32) {
    (color.with_alpha(1.0).to_string(), color.alpha())
}

/// A native SVG tooltip.
fn tooltip(content: &str) -> svg_element::Element {
    let mut title = svg_element::Element::new("title");
    title.append(SvgText::new(content));
    title
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

    fn render(text: &str, kind: ChartKind) -> String {
        let dataset = parse(text, &ParseOptions::default());
        let selection = ChartSelection::for_dataset(&dataset, kind);
        let spec = build(&dataset, &selection, &ChartStyle::default()).unwrap();
        SvgBuilder::new().build().unwrap().export_chart(&spec).unwrap()
    }

    #[test]
    fn test_builder_rejects_empty_canvas() {
        assert!(SvgBuilder::new().with_size(Size::new(0.0, 100.0)).build().is_err());
        assert!(SvgBuilder::new().with_size(Size::new(100.0, f32::NAN)).build().is_err());
        assert!(SvgBuilder::new().with_size(Size::new(320.0, 200.0)).build().is_ok());
    }

    #[test]
    fn test_document_has_canvas_size() {
        let dataset = parse("k,v\na,1", &ParseOptions::default());
        let selection = ChartSelection::for_dataset(&dataset, ChartKind::Line);
        let spec = build(&dataset, &selection, &ChartStyle::default()).unwrap();

        let svg = SvgBuilder::new()
            .with_size(Size::new(320.0, 200.0))
            .build()
            .unwrap()
            .export_chart(&spec)
            .unwrap();

        assert!(svg.contains("viewBox=\"0 0 320 200\""));
        assert!(svg.contains("width=\"320\""));
    }

    #[test]
    fn test_every_kind_renders_layers() {
        for kind in ChartKind::ALL {
            let svg = render("k,v\na,1\nb,2\nc,3", kind);

            assert!(svg.contains("data-layer=\"background\""), "{kind}");
            assert!(svg.contains("data-layer=\"legend\""), "{kind}");
            assert!(svg.contains("<title>"), "{kind}");
        }
    }

    #[test]
    fn test_bar_chart_draws_one_rect_per_value() {
        let svg = render("k,v\na,1\nb,2\nc,3", ChartKind::Bar);
        let group_start = svg.find("data-layer=\"series\"").unwrap();
        let series = &svg[group_start..];

        assert_eq!(series.matches("<rect").count(), 3);
    }

    #[test]
    fn test_axes_only_for_cartesian_kinds() {
        assert!(render("k,v\na,1", ChartKind::Bar).contains("data-layer=\"grid\""));
        assert!(!render("k,v\na,1", ChartKind::Pie).contains("data-layer=\"grid\""));
    }

    #[test]
    fn test_extreme_values_keep_coordinates_finite() {
        for kind in [ChartKind::Bar, ChartKind::Line] {
            let svg = render("k,v\na,1.7e308\nb,-1.7e308\nc,3", kind);

            assert!(!svg.contains("NaN"), "{kind}");
            assert!(!svg.contains("inf"), "{kind}");
        }
    }

    #[test]
    fn test_labels_are_escaped() {
        let svg = render("k,v\n<b>&,1", ChartKind::Bar);

        assert!(svg.contains("&lt;b&gt;&amp;"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn test_paint_splits_alpha() {
        let (fill, opacity) = paint(Color::srgba(255, 0, 0, 0.25));

        assert_eq!(opacity, 0.25);
        assert_eq!(fill, Color::srgba(255, 0, 0, 1.0).to_string());
    }
}
