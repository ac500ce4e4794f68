use thiserror::Error;

/// Result type alias for operations that may fail with [`TraceError`].
pub type TraceResult<T> = std::result::Result<T, TraceError>;

/// Error types that can occur while turning a bitmap into an SVG document.
///
/// Only configuration problems and failures at the input boundary are raised.
/// Degenerate geometry (empty palettes, tiny contours, truncated walks) is
/// absorbed into the output instead.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A tracing option is out of range. Raised before any pixel is scanned.
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
    /// Image loading or decoding error.
    #[error("Image loading failed: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// The decoded image cannot be rendered into a pixel buffer.
    #[error("Cannot render image into a pixel buffer: {0}")]
    RenderContext(String),
    /// Raw pixel data does not match the declared dimensions.
    #[error("Pixel buffer holds {found} bytes but {expected} were expected")]
    BufferSize { expected: usize, found: usize },
    /// Width or height is zero, or their product overflows.
    #[error("Invalid pixel buffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The caller asked the pipeline to stop.
    #[error("Tracing was cancelled")]
    Cancelled,
}

impl TraceError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TraceError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
