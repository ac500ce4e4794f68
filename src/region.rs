use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::quantize::Palette;

/// A fixed-size bit set over the `width * height` pixels of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    words: Vec<u64>,
}

impl Bitmap {
    /// Create an all-clear bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            words: vec![0; len.div_ceil(64)],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of addressable pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set(&mut self, index: usize) {
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len() && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Membership by coordinate; anything outside the frame is clear.
    pub fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.contains(y as usize * self.width + x as usize)
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the indices of set pixels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(wi * 64 + tz)
            })
        })
    }

    /// Whether any pixel is set in both bitmaps.
    pub fn intersects(&self, other: &Bitmap) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }
}

/// The pixels assigned to one palette color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// The palette color this region is filled with.
    pub color: Color,
    /// Position of `color` in the palette; this is the draw order.
    pub rank: usize,
    /// Member pixels.
    pub pixels: Bitmap,
}

impl Region {
    pub fn pixel_count(&self) -> usize {
        self.pixels.count()
    }
}

/// Assign every opaque pixel to its nearest palette color.
///
/// A pixel whose nearest palette color is farther than `tolerance * 3` stays
/// unassigned. Palette entries that attract no pixels produce no region; the
/// remaining regions are returned in palette order.
pub fn classify(buffer: &PixelBuffer, palette: &Palette, tolerance: u32) -> Vec<Region> {
    let (width, height) = (buffer.width() as usize, buffer.height() as usize);
    let colors: Vec<Color> = palette.colors().collect();
    if colors.is_empty() {
        return Vec::new();
    }

    let max_distance = f64::from(tolerance) * 3.0;
    let mut masks = vec![Bitmap::new(width, height); colors.len()];
    let mut assigned = vec![false; colors.len()];

    for (index, px) in buffer.opaque_pixels() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (rank, color) in colors.iter().enumerate() {
            let d = px.distance(color);
            if d < best_distance {
                best_distance = d;
                best = rank;
            }
        }
        if best_distance > max_distance {
            continue;
        }
        masks[best].set(index);
        assigned[best] = true;
    }

    colors
        .into_iter()
        .zip(masks)
        .enumerate()
        .filter(|(rank, _)| assigned[*rank])
        .map(|(rank, (color, pixels))| Region {
            color,
            rank,
            pixels,
        })
        .collect()
}
