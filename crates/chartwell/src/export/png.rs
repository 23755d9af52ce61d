//! PNG export backend.
//!
//! Rasterizes the document produced by the [`svg`](super::svg) backend, so
//! both formats show the same chart. The image is the SVG canvas size
//! multiplied by the scale factor.

use std::fmt;

use log::{debug, info};
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{Options, Tree},
};

use chartwell_core::chart::ChartSpec;

use super::{
    Error,
    svg::{Svg, SvgBuilder},
};

/// Builder for [`Png`] exporters.
#[derive(Debug, Clone)]
pub struct PngBuilder {
    svg: SvgBuilder,
    scale: f32,
    system_fonts: bool,
}

impl Default for PngBuilder {
    fn default() -> Self {
        Self {
            svg: SvgBuilder::default(),
            scale: 1.0,
            system_fonts: true,
        }
    }
}

impl PngBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the SVG layout the image is rasterized from.
    pub fn with_svg(mut self, svg: SvgBuilder) -> Self {
        self.svg = svg;
        self
    }

    /// Sets the number of image pixels per canvas pixel.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Controls whether installed fonts are loaded for chart text. Without
    /// them text is left out of the image.
    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        self.system_fonts = system_fonts;
        self
    }

    /// Builds the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the canvas size or the scale is not
    /// positive and finite.
    pub fn build(self) -> Result<Png, Error> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::Render(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        let svg = self.svg.build()?;

        let mut options = Options::default();
        if self.system_fonts {
            options.fontdb_mut().load_system_fonts();
            debug!(faces = options.fontdb.len(); "Loaded system fonts");
        }

        Ok(Png {
            svg,
            scale: self.scale,
            options,
        })
    }
}

/// PNG exporter for chart specifications.
pub struct Png {
    svg: Svg,
    scale: f32,
    options: Options<'static>,
}

impl fmt::Debug for Png {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Png")
            .field("svg", &self.svg)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl Png {
    /// Returns the image size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let size = self.svg.size();
        let pixels = |v: f32| (v * self.scale).ceil().max(1.0) as u32;
        (pixels(size.width()), pixels(size.height()))
    }

    /// Renders `spec` to PNG-encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the SVG cannot be parsed back, the image
    /// is too large to allocate, or PNG encoding fails.
    pub fn export_png(&self, spec: &ChartSpec) -> Result<Vec<u8>, Error> {
        let (width, height) = self.pixel_size();
        info!(kind:% = spec.kind(), width = width, height = height; "Rendering PNG chart");

        let document = self.svg.render_chart(spec).to_string();
        let tree = Tree::from_str(&document, &self.options)
            .map_err(|err| Error::Render(format!("SVG parse failed: {err}")))?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::Render(format!("cannot allocate a {width}x{height} image")))?;
        resvg::render(
            &tree,
            Transform::from_scale(self.scale, self.scale),
            &mut pixmap.as_mut(),
        );

        pixmap
            .encode_png()
            .map_err(|err| Error::Render(format!("PNG encoding failed: {err}")))
    }
}
