//! Declarative chart specification.
//!
//! A [`ChartSpec`] is the output of the chart configuration builder and the
//! input to any renderer: labels, series of optional values, colors, and
//! style hints. It is plain data and is rebuilt from scratch whenever the
//! dataset, selection, or style changes.
//!
//! # Overview
//!
//! - [`ChartStyle`] - User-chosen appearance options fed into the builder.
//! - [`ChartSpec`] - The complete chart description handed to a renderer.
//! - [`Series`] - One named sequence of values sharing the label axis.
//! - [`SeriesColors`] - A single series color or one color per data point.
//! - [`SeriesStyle`] - Fixed per-kind visual policy (fill, markers, smoothing).
//! - [`AxisStyle`], [`LegendStyle`], [`TooltipStyle`] - Renderer style hints.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{color::Color, selection::ChartKind};

/// Named color palettes offered to the user.
///
/// The palette is carried through to renderers as a hint; generated series
/// colors always use the hue-stepping scheme in [`crate::color`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Vibrant,
    Pastel,
    Cool,
    Warm,
    Mono,
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vibrant => "vibrant",
            Self::Pastel => "pastel",
            Self::Cool => "cool",
            Self::Warm => "warm",
            Self::Mono => "mono",
        };
        f.write_str(name)
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vibrant" => Ok(Self::Vibrant),
            "pastel" => Ok(Self::Pastel),
            "cool" => Ok(Self::Cool),
            "warm" => Ok(Self::Warm),
            "mono" | "monochrome" => Ok(Self::Mono),
            other => Err(format!("unknown palette `{other}`")),
        }
    }
}

/// Appearance options chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    palette: Palette,
    base_color: Color,
    background_color: Color,
    text_color: Color,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            base_color: Color::srgba(0x6b, 0x76, 0xff, 1.0),
            background_color: Color::srgba(0x0b, 0x0f, 0x20, 1.0),
            text_color: Color::srgba(0xf1, 0xf3, 0xff, 1.0),
        }
    }
}

impl ChartStyle {
    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}

/// Colors of a series: one for the whole series, or one per data point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesColors {
    Uniform(Color),
    PerPoint(Vec<Color>),
}

impl SeriesColors {
    /// Returns the color used for the data point at `index`.
    ///
    /// Per-point colors cycle when `index` runs past the end; an empty
    /// per-point list yields the default color.
    pub fn at(&self, index: usize) -> Color {
        match self {
            Self::Uniform(color) => *color,
            Self::PerPoint(colors) if colors.is_empty() => Color::default(),
            Self::PerPoint(colors) => colors[index % colors.len()],
        }
    }
}

/// Fixed visual policy of a series, determined by the chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    /// Alpha applied to the series colors when filling bars, areas, or slices.
    fill_alpha: f32,
    /// Border color; `None` means the series color itself.
    border_color: Option<Color>,
    border_width: f32,
    /// Radius of point markers; zero hides them.
    point_radius: f32,
    /// Curve smoothing factor; zero draws straight segments.
    tension: f32,
    /// Whether the area under a line is filled.
    fill_area: bool,
}

impl SeriesStyle {
    /// Line series: translucent area fill, visible markers, smoothed curve.
    pub fn line() -> Self {
        Self {
            fill_alpha: 0.2,
            border_color: None,
            border_width: 2.0,
            point_radius: 4.0,
            tension: 0.3,
            fill_area: true,
        }
    }

    /// Bar series: opaque fill, no markers, no smoothing.
    pub fn bar() -> Self {
        Self {
            fill_alpha: 1.0,
            border_color: None,
            border_width: 1.0,
            point_radius: 0.0,
            tension: 0.0,
            fill_area: false,
        }
    }

    /// Pie and doughnut slices, outlined in the canvas background color.
    pub fn slices(border_color: Color) -> Self {
        Self {
            fill_alpha: 1.0,
            border_color: Some(border_color),
            border_width: 2.0,
            point_radius: 0.0,
            tension: 0.0,
            fill_area: false,
        }
    }

    /// Returns the style for series of `kind` drawn over `background`.
    pub fn for_kind(kind: ChartKind, background: Color) -> Self {
        match kind {
            ChartKind::Bar => Self::bar(),
            ChartKind::Line => Self::line(),
            ChartKind::Pie | ChartKind::Doughnut => Self::slices(background),
        }
    }

    pub fn fill_alpha(&self) -> f32 {
        self.fill_alpha
    }

    pub fn border_color(&self) -> Option<Color> {
        self.border_color
    }

    pub fn border_width(&self) -> f32 {
        self.border_width
    }

    pub fn point_radius(&self) -> f32 {
        self.point_radius
    }

    pub fn tension(&self) -> f32 {
        self.tension
    }

    pub fn fill_area(&self) -> bool {
        self.fill_area
    }
}

/// One named sequence of plotted values sharing the label axis.
///
/// `None` values are missing points, rendered as gaps rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    #[serde(rename = "data")]
    values: Vec<Option<f64>>,
    colors: SeriesColors,
    style: SeriesStyle,
}

impl Series {
    pub fn new(
        name: impl Into<String>,
        values: Vec<Option<f64>>,
        colors: SeriesColors,
        style: SeriesStyle,
    ) -> Self {
        Self {
            name: name.into(),
            values,
            colors,
            style,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn colors(&self) -> &SeriesColors {
        &self.colors
    }

    pub fn style(&self) -> &SeriesStyle {
        &self.style
    }

    /// Returns the fill color for the data point at `index`.
    pub fn fill_color(&self, index: usize) -> Color {
        self.colors.at(index).with_alpha(self.style.fill_alpha)
    }

    /// Returns the border color for the data point at `index`.
    pub fn border_color(&self, index: usize) -> Color {
        self.style
            .border_color
            .unwrap_or_else(|| self.colors.at(index))
    }
}

/// Style hints for the category and value axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisStyle {
    tick_color: Color,
    tick_font_size: f32,
    grid_color: Color,
}

impl AxisStyle {
    pub fn new(tick_color: Color, tick_font_size: f32, grid_color: Color) -> Self {
        Self {
            tick_color,
            tick_font_size,
            grid_color,
        }
    }

    pub fn tick_color(&self) -> Color {
        self.tick_color
    }

    pub fn tick_font_size(&self) -> f32 {
        self.tick_font_size
    }

    pub fn grid_color(&self) -> Color {
        self.grid_color
    }
}

/// Style hints for the legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendStyle {
    label_color: Color,
    font_size: f32,
}

impl LegendStyle {
    pub fn new(label_color: Color, font_size: f32) -> Self {
        Self {
            label_color,
            font_size,
        }
    }

    pub fn label_color(&self) -> Color {
        self.label_color
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

/// Style hints for hover tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    title_color: Color,
    body_color: Color,
    background: Color,
}

impl TooltipStyle {
    pub fn new(title_color: Color, body_color: Color, background: Color) -> Self {
        Self {
            title_color,
            body_color,
            background,
        }
    }

    pub fn title_color(&self) -> Color {
        self.title_color
    }

    pub fn body_color(&self) -> Color {
        self.body_color
    }

    pub fn background(&self) -> Color {
        self.background
    }
}

/// A complete, renderer-ready chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    kind: ChartKind,
    labels: Vec<String>,
    series: Vec<Series>,
    /// Axis hints; `None` when the chart kind has no axes.
    axes: Option<AxisStyle>,
    legend: LegendStyle,
    tooltip: TooltipStyle,
    background: Color,
    palette: Palette,
    accent: Color,
}

impl ChartSpec {
    /// Creates a chart specification.
    ///
    /// Background, palette, and accent color are taken from `style`.
    pub fn new(
        kind: ChartKind,
        labels: Vec<String>,
        series: Vec<Series>,
        axes: Option<AxisStyle>,
        legend: LegendStyle,
        tooltip: TooltipStyle,
        style: &ChartStyle,
    ) -> Self {
        Self {
            kind,
            labels,
            series,
            axes,
            legend,
            tooltip,
            background: style.background_color(),
            palette: style.palette(),
            accent: style.base_color(),
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn axes(&self) -> Option<&AxisStyle> {
        self.axes.as_ref()
    }

    pub fn legend(&self) -> &LegendStyle {
        &self.legend
    }

    pub fn tooltip(&self) -> &TooltipStyle {
        &self.tooltip
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn accent(&self) -> Color {
        self.accent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_from_str() {
        assert_eq!("Pastel".parse::<Palette>(), Ok(Palette::Pastel));
        assert_eq!("monochrome".parse::<Palette>(), Ok(Palette::Mono));
        assert!("neon".parse::<Palette>().is_err());
    }

    #[test]
    fn test_series_colors_at() {
        let red = Color::new("red").unwrap();
        let blue = Color::new("blue").unwrap();

        assert_eq!(SeriesColors::Uniform(red).at(7), red);

        let per_point = SeriesColors::PerPoint(vec![red, blue]);
        assert_eq!(per_point.at(0), red);
        assert_eq!(per_point.at(1), blue);
        assert_eq!(per_point.at(2), red);

        assert_eq!(SeriesColors::PerPoint(Vec::new()).at(0), Color::default());
    }

    #[test]
    fn test_kind_styles() {
        let background = Color::new("navy").unwrap();

        let line = SeriesStyle::for_kind(ChartKind::Line, background);
        assert!(line.fill_alpha() < 1.0);
        assert!(line.point_radius() > 0.0);
        assert!(line.tension() > 0.0);
        assert!(line.fill_area());

        let bar = SeriesStyle::for_kind(ChartKind::Bar, background);
        assert_eq!(bar.fill_alpha(), 1.0);
        assert_eq!(bar.point_radius(), 0.0);
        assert_eq!(bar.tension(), 0.0);

        let pie = SeriesStyle::for_kind(ChartKind::Doughnut, background);
        assert_eq!(pie.border_color(), Some(background));
        assert_eq!(pie.border_width(), 2.0);
    }

    #[test]
    fn test_series_fill_and_border() {
        let red = Color::new("red").unwrap();
        let series = Series::new(
            "a",
            vec![Some(1.0)],
            SeriesColors::Uniform(red),
            SeriesStyle::line(),
        );

        assert_eq!(series.border_color(0), red);
        assert!((series.fill_color(0).alpha() - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_series_serializes_values_as_data() {
        let series = Series::new(
            "b",
            vec![Some(2.0), None],
            SeriesColors::Uniform(Color::new("red").unwrap()),
            SeriesStyle::bar(),
        );
        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(json["name"], "b");
        assert_eq!(json["data"], serde_json::json!([2.0, null]));
        assert_eq!(json["style"]["pointRadius"], 0.0);
    }
}
