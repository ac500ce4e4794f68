pub mod buffer;
pub mod color;
pub mod config;
pub mod contour;
pub mod error;
pub mod quantize;
pub mod region;
pub mod simplify;
pub mod svg;
pub mod vectorizer;

pub use buffer::PixelBuffer;
pub use color::Color;
pub use config::TraceOptions;
pub use error::{TraceError, TraceResult};
pub use quantize::{Palette, PaletteEntry};
pub use svg::{PathEntry, SvgDocument};
pub use vectorizer::ImageVectorizer;
pub use vectorizer::polygon::PolygonVectorizer;

use std::path::Path;
use std::sync::atomic::AtomicBool;

/// Trace a pixel buffer into an SVG string using the polygon vectorizer.
pub fn trace_to_svg_string(buffer: &PixelBuffer, options: &TraceOptions) -> TraceResult<String> {
    let document = PolygonVectorizer.vectorize(buffer, options)?;
    Ok(document.to_svg_string())
}

/// Entry point for configuring and running a trace.
#[derive(Debug, Clone, Default)]
pub struct Polytrace {
    options: TraceOptions,
}

impl Polytrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of options.
    pub fn with_options(options: TraceOptions) -> Self {
        Self { options }
    }

    /// Set the maximum number of palette colors.
    pub fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.options.max_colors = max_colors;
        self
    }

    /// Set the quantization step and color-match distance scale.
    pub fn with_color_tolerance(mut self, color_tolerance: u32) -> Self {
        self.options.color_tolerance = color_tolerance;
        self
    }

    /// Set the polygon simplification tolerance in pixels.
    pub fn with_simplify_tolerance(mut self, simplify_tolerance: f64) -> Self {
        self.options.simplify_tolerance = simplify_tolerance;
        self
    }

    /// Set the background fill (`"transparent"` for none).
    pub fn with_background_color(mut self, background_color: impl Into<String>) -> Self {
        self.options.background_color = background_color.into();
        self
    }

    /// Get a reference to the configured options.
    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    /// Quantize the buffer and return the palette that tracing would use.
    pub fn palette(&self, buffer: &PixelBuffer) -> TraceResult<Palette> {
        self.options.validate()?;
        quantize::quantize(buffer, self.options.max_colors, self.options.color_tolerance)
    }

    /// Trace a pixel buffer into a structured document.
    pub fn document(&self, buffer: &PixelBuffer) -> TraceResult<SvgDocument> {
        PolygonVectorizer.vectorize(buffer, &self.options)
    }

    /// Trace a pixel buffer into an SVG string.
    pub fn trace(&self, buffer: &PixelBuffer) -> TraceResult<String> {
        trace_to_svg_string(buffer, &self.options)
    }

    /// Trace a pixel buffer, giving up once `cancel` is set.
    pub fn trace_with_cancel(
        &self,
        buffer: &PixelBuffer,
        cancel: &AtomicBool,
    ) -> TraceResult<String> {
        let document = PolygonVectorizer.vectorize_with_cancel(buffer, &self.options, cancel)?;
        Ok(document.to_svg_string())
    }

    /// Decode an image file and trace it into an SVG string.
    pub fn trace_file(&self, image_path: impl AsRef<Path>) -> TraceResult<String> {
        // Configuration errors take precedence over decode errors.
        self.options.validate()?;
        let buffer = PixelBuffer::open(image_path)?;
        self.trace(&buffer)
    }
}
