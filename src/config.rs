use crate::{TraceError, TraceResult};

/// Background value that suppresses the leading `rect`.
pub const TRANSPARENT: &str = "transparent";

/// Options controlling quantization, simplification and SVG output.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceOptions {
    /// Upper bound on the number of palette colors kept after quantization.
    pub max_colors: usize,
    /// Bucket width used when quantizing each channel; also scales the
    /// distance cut-off used when assigning pixels to palette colors.
    pub color_tolerance: u32,
    /// Ramer–Douglas–Peucker tolerance in pixels.
    pub simplify_tolerance: f64,
    /// Fill of the full-canvas background `rect`, or `"transparent"` for none.
    pub background_color: String,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_colors: 16,
            color_tolerance: 30,
            simplify_tolerance: 1.0,
            background_color: TRANSPARENT.to_string(),
        }
    }
}

impl TraceOptions {
    /// Set the maximum palette size.
    pub fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    /// Set the per-channel quantization step.
    pub fn with_color_tolerance(mut self, color_tolerance: u32) -> Self {
        self.color_tolerance = color_tolerance;
        self
    }

    /// Set the polygon simplification tolerance.
    pub fn with_simplify_tolerance(mut self, simplify_tolerance: f64) -> Self {
        self.simplify_tolerance = simplify_tolerance;
        self
    }

    /// Set the background fill. Pass `"transparent"` to omit the background.
    pub fn with_background_color(mut self, background_color: impl Into<String>) -> Self {
        self.background_color = background_color.into();
        self
    }

    /// Whether a background `rect` will be emitted.
    pub fn has_background(&self) -> bool {
        self.background_color != TRANSPARENT
    }

    /// Check every option, returning the first violation found.
    pub fn validate(&self) -> TraceResult<()> {
        if self.max_colors < 1 {
            return Err(TraceError::invalid("max_colors", "must be at least 1"));
        }
        if self.color_tolerance < 1 {
            return Err(TraceError::invalid("color_tolerance", "must be at least 1"));
        }
        if !self.simplify_tolerance.is_finite() {
            return Err(TraceError::invalid(
                "simplify_tolerance",
                format!("must be a finite number, got {}", self.simplify_tolerance),
            ));
        }
        if self.simplify_tolerance < 0.0 {
            return Err(TraceError::invalid(
                "simplify_tolerance",
                format!("must not be negative, got {}", self.simplify_tolerance),
            ));
        }
        if self.background_color.trim().is_empty() {
            return Err(TraceError::invalid(
                "background_color",
                "must be a color or \"transparent\"",
            ));
        }
        Ok(())
    }
}
