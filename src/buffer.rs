use std::path::Path;

use image::RgbaImage;

use crate::color::Color;
use crate::{TraceError, TraceResult};

/// Pixels with an alpha below this value are treated as transparent.
pub const ALPHA_THRESHOLD: u8 = 10;

/// An immutable RGBA8 bitmap, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes. `data.len()` must equal `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> TraceResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(TraceError::BufferSize {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer where every pixel has the same color.
    pub fn from_pixel(width: u32, height: u32, color: Color) -> TraceResult<Self> {
        let len = byte_len(width, height)?;
        let rgba = [color.r, color.g, color.b, color.a];
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Color,
    ) -> TraceResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                let c = f(x, y);
                data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode an image file and convert it to RGBA8.
    pub fn open(path: impl AsRef<Path>) -> TraceResult<Self> {
        let decoded = image::open(path.as_ref())?;
        Self::try_from(decoded.to_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels, `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Color at a linear pixel index (`y * width + x`).
    pub fn pixel(&self, index: usize) -> Color {
        let base = index * 4;
        Color::rgba(
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        )
    }

    /// Iterate over `(index, color)` for every pixel at or above [`ALPHA_THRESHOLD`].
    pub fn opaque_pixels(&self) -> impl Iterator<Item = (usize, Color)> + '_ {
        self.data
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, px)| px[3] >= ALPHA_THRESHOLD)
            .map(|(i, px)| (i, Color::rgba(px[0], px[1], px[2], px[3])))
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = TraceError;

    fn try_from(image: RgbaImage) -> TraceResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TraceError::RenderContext(format!(
                "decoded image has no pixels ({width}x{height})"
            )));
        }
        Self::new(width, height, image.into_raw())
    }
}

fn byte_len(width: u32, height: u32) -> TraceResult<usize> {
    if width == 0 || height == 0 {
        return Err(TraceError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(TraceError::InvalidDimensions { width, height })
}
