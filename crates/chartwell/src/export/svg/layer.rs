//! Z-ordered collection of SVG nodes.
//!
//! Renderers push nodes into a [`LayeredOutput`] tagged with a
//! [`RenderLayer`]; [`LayeredOutput::render`] emits one `<g data-layer=...>`
//! group per non-empty layer, bottom layer first. Within a layer, nodes keep
//! the order in which they were added.

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas fill.
    Background,
    /// Legend swatches and labels.
    Legend,
    /// Grid lines behind the data.
    Grid,
    /// Translucent areas under lines.
    Area,
    /// Bars, line strokes, and slices.
    Series,
    /// Point markers on lines.
    Marker,
    /// Axis tick and category labels.
    Text,
}

impl RenderLayer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Legend => "legend",
            Self::Grid => "grid",
            Self::Area => "area",
            Self::Series => "series",
            Self::Marker => "marker",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by [`RenderLayer`].
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends every node of `other`, keeping its layers.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the output and returns one group per non-empty layer.
    pub fn render(mut self) -> Vec<SvgNode> {
        // Stable: insertion order survives within a layer.
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut groups: Vec<(RenderLayer, svg_element::Group)> = Vec::new();
        for (layer, node) in self.items {
            match groups.last_mut() {
                Some((current, group)) if *current == layer => {
                    let taken = std::mem::replace(group, svg_element::Group::new());
                    *group = taken.add(node);
                }
                _ => {
                    let group = svg_element::Group::new()
                        .set("data-layer", layer.name())
                        .add(node);
                    groups.push((layer, group));
                }
            }
        }

        groups
            .into_iter()
            .map(|(_, group)| Box::new(group) as SvgNode)
            .collect()
    }
}
