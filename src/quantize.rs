use indexmap::IndexMap;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::{TraceError, TraceResult};

/// A palette color together with the number of source pixels that fell into its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Color,
    pub count: usize,
}

/// Quantized colors ordered by descending pixel count, ties in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().map(|e| e.color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Snap one channel to the nearest multiple of `tolerance`, clamped to 255.
fn bucket_channel(value: u8, tolerance: u32) -> u8 {
    let step = f64::from(tolerance);
    let snapped = (f64::from(value) / step).round() * step;
    snapped.clamp(0.0, 255.0) as u8
}

/// Bucket the RGB channels of a pixel; the result is always opaque.
pub fn bucket_color(color: Color, tolerance: u32) -> Color {
    Color::opaque(
        bucket_channel(color.r, tolerance),
        bucket_channel(color.g, tolerance),
        bucket_channel(color.b, tolerance),
    )
}

/// Reduce the opaque pixels of `buffer` to at most `max_colors` bucketed colors.
///
/// Every pixel with alpha at or above the threshold is bucketed per channel and
/// counted. Buckets are ranked by count with a stable sort, so equally common
/// colors keep the order in which the scan first met them.
pub fn quantize(buffer: &PixelBuffer, max_colors: usize, tolerance: u32) -> TraceResult<Palette> {
    if max_colors < 1 {
        return Err(TraceError::invalid("max_colors", "must be at least 1"));
    }
    if tolerance < 1 {
        return Err(TraceError::invalid("color_tolerance", "must be at least 1"));
    }

    let mut buckets: IndexMap<Color, usize> = IndexMap::new();
    for (_, px) in buffer.opaque_pixels() {
        *buckets.entry(bucket_color(px, tolerance)).or_insert(0) += 1;
    }

    let mut entries: Vec<PaletteEntry> = buckets
        .into_iter()
        .map(|(color, count)| PaletteEntry { color, count })
        .collect();
    // `sort_by` is stable: ties stay in first-seen order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(max_colors);

    Ok(Palette { entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, color: Color) -> PixelBuffer {
        PixelBuffer::from_pixel(w, h, color).unwrap()
    }

    mod bucket_color {
        use super::*;

        #[test]
        fn multiples_are_unchanged() {
            assert_eq!(
                bucket_color(Color::opaque(30, 60, 90), 30),
                Color::opaque(30, 60, 90)
            );
        }

        #[test]
        fn rounds_to_nearest_multiple() {
            // 44 / 30 = 1.47 -> 30, 45 / 30 = 1.5 -> 60, 16 / 30 = 0.53 -> 30
            assert_eq!(
                bucket_color(Color::opaque(44, 45, 16), 30),
                Color::opaque(30, 60, 30)
            );
        }

        #[test]
        fn clamps_to_255() {
            // 250 / 30 = 8.33 -> 240, 255 / 30 = 8.5 -> 270 -> 255
            assert_eq!(
                bucket_color(Color::opaque(250, 255, 0), 30),
                Color::opaque(240, 255, 0)
            );
        }

        #[test]
        fn forces_opaque_alpha() {
            assert_eq!(bucket_color(Color::rgba(0, 0, 0, 12), 1).a, 255);
        }
    }

    mod quantize {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn single_color_image() {
                let palette = quantize(&solid(10, 10, Color::opaque(30, 30, 30)), 16, 30).unwrap();
                assert_eq!(
                    palette.entries(),
                    &[PaletteEntry {
                        color: Color::opaque(30, 30, 30),
                        count: 100
                    }]
                );
            }

            #[test]
            fn transparent_image_yields_empty_palette() {
                let palette = quantize(&solid(5, 5, Color::rgba(200, 0, 0, 0)), 16, 30).unwrap();
                assert!(palette.is_empty());
            }

            #[test]
            fn alpha_threshold_is_inclusive() {
                let palette = quantize(&solid(1, 1, Color::rgba(0, 0, 0, 10)), 16, 30).unwrap();
                assert_eq!(palette.len(), 1);
                let palette = quantize(&solid(1, 1, Color::rgba(0, 0, 0, 9)), 16, 30).unwrap();
                assert!(palette.is_empty());
            }

            #[test]
            fn orders_by_descending_count() {
                // One red pixel, then three blue pixels.
                let buffer = PixelBuffer::from_fn(4, 1, |x, _| {
                    if x == 0 {
                        Color::opaque(240, 0, 0)
                    } else {
                        Color::opaque(0, 0, 240)
                    }
                })
                .unwrap();
                let palette = quantize(&buffer, 16, 30).unwrap();
                let colors: Vec<Color> = palette.colors().collect();
                assert_eq!(
                    colors,
                    vec![Color::opaque(0, 0, 240), Color::opaque(240, 0, 0)]
                );
            }

            #[test]
            fn ties_keep_first_seen_order() {
                let buffer = PixelBuffer::from_fn(4, 1, |x, _| match x {
                    0 | 2 => Color::opaque(90, 90, 90),
                    _ => Color::opaque(60, 60, 60),
                })
                .unwrap();
                let palette = quantize(&buffer, 16, 30).unwrap();
                let colors: Vec<Color> = palette.colors().collect();
                assert_eq!(
                    colors,
                    vec![Color::opaque(90, 90, 90), Color::opaque(60, 60, 60)]
                );
            }

            #[test]
            fn similar_pixels_share_a_bucket() {
                let buffer = PixelBuffer::from_fn(3, 1, |x, _| {
                    Color::opaque(28 + x as u8, 31, 33)
                })
                .unwrap();
                let palette = quantize(&buffer, 16, 30).unwrap();
                assert_eq!(palette.len(), 1);
                assert_eq!(palette.entries()[0].count, 3);
            }

            #[test]
            fn truncates_to_max_colors() {
                let buffer =
                    PixelBuffer::from_fn(8, 1, |x, _| Color::opaque(x as u8 * 30, 0, 0)).unwrap();
                let palette = quantize(&buffer, 3, 30).unwrap();
                assert_eq!(palette.len(), 3);
                let colors: Vec<Color> = palette.colors().collect();
                assert_eq!(colors[0], Color::opaque(0, 0, 0));
                assert_eq!(colors[2], Color::opaque(60, 0, 0));
            }

            #[test]
            fn zero_max_colors_is_invalid() {
                let err = quantize(&solid(1, 1, Color::opaque(0, 0, 0)), 0, 30).unwrap_err();
                assert!(matches!(
                    err,
                    TraceError::InvalidConfiguration {
                        field: "max_colors",
                        ..
                    }
                ));
            }

            #[test]
            fn zero_tolerance_is_invalid() {
                let err = quantize(&solid(1, 1, Color::opaque(0, 0, 0)), 4, 0).unwrap_err();
                assert!(matches!(
                    err,
                    TraceError::InvalidConfiguration {
                        field: "color_tolerance",
                        ..
                    }
                ));
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// quantize: palette never exceeds max_colors and every entry is opaque
                #[test]
                fn palette_is_bounded(
                    w in 1u32..12,
                    h in 1u32..12,
                    seed in proptest::collection::vec(proptest::num::u8::ANY, 4..64),
                    max_colors in 1usize..8,
                    tolerance in 1u32..80
                ) {
                    let buffer = PixelBuffer::from_fn(w, h, |x, y| {
                        let i = ((y * w + x) as usize * 4) % seed.len();
                        Color::rgba(
                            seed[i],
                            seed[(i + 1) % seed.len()],
                            seed[(i + 2) % seed.len()],
                            seed[(i + 3) % seed.len()],
                        )
                    }).unwrap();
                    let palette = quantize(&buffer, max_colors, tolerance).unwrap();

                    prop_assert!(palette.len() <= max_colors);
                    prop_assert!(palette.entries().iter().all(|e| e.color.a == 255));
                    prop_assert!(palette.entries().windows(2).all(|w| w[0].count >= w[1].count));
                }

                /// quantize: identical input gives an identical palette
                #[test]
                fn deterministic(
                    pixels in proptest::collection::vec(proptest::num::u8::ANY, 64)
                ) {
                    let buffer = PixelBuffer::new(4, 4, pixels).unwrap();
                    let a = quantize(&buffer, 4, 17).unwrap();
                    let b = quantize(&buffer, 4, 17).unwrap();
                    prop_assert_eq!(a, b);
                }
            }
        }
    }
}
