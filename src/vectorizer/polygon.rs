use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument};

use crate::config::TraceOptions;
use crate::contour::{Contour, MIN_CONTOUR_POINTS, trace_contours};
use crate::quantize::quantize;
use crate::region::{Region, classify};
use crate::simplify::simplify_contour;
use crate::svg::{PathEntry, SvgDocument};
use crate::{PixelBuffer, TraceError, TraceResult};

use super::ImageVectorizer;

/// Palette-quantizing polygon tracer producing filled SVG paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonVectorizer;

impl ImageVectorizer for PolygonVectorizer {
    type Options = TraceOptions;
    type Output = SvgDocument;

    fn vectorize(&self, buffer: &PixelBuffer, options: &Self::Options) -> TraceResult<Self::Output> {
        trace_document(buffer, options, None)
    }

    fn vectorize_with_cancel(
        &self,
        buffer: &PixelBuffer,
        options: &Self::Options,
        cancel: &AtomicBool,
    ) -> TraceResult<Self::Output> {
        trace_document(buffer, options, Some(cancel))
    }
}

/// Run quantization, classification, tracing, simplification and serialization setup.
///
/// Options are validated before the first pixel is read. When `cancel` is given
/// it is polled before each stage and between regions.
#[instrument(skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn trace_document(
    buffer: &PixelBuffer,
    options: &TraceOptions,
    cancel: Option<&AtomicBool>,
) -> TraceResult<SvgDocument> {
    options.validate()?;
    check_cancel(cancel)?;

    let palette = quantize(buffer, options.max_colors, options.color_tolerance)?;
    debug!(colors = palette.len(), "quantized palette");
    check_cancel(cancel)?;

    let regions = classify(buffer, &palette, options.color_tolerance);
    debug!(regions = regions.len(), "classified pixels");
    check_cancel(cancel)?;

    let paths = trace_regions(&regions, options.simplify_tolerance, cancel)?;
    debug!(paths = paths.len(), "traced regions");

    Ok(SvgDocument::new(
        buffer.width(),
        buffer.height(),
        &options.background_color,
        paths,
    ))
}

fn check_cancel(cancel: Option<&AtomicBool>) -> TraceResult<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(TraceError::Cancelled),
        _ => Ok(()),
    }
}

/// Trace and simplify one region. Returns `None` when nothing drawable is left.
fn trace_region(region: &Region, tolerance: f64) -> Option<PathEntry> {
    let contours = trace_contours(&region.pixels);
    let raw_points: usize = contours.iter().map(Contour::len).sum();

    let simplified: Vec<Contour> = contours
        .iter()
        .map(|c| simplify_contour(c, tolerance))
        .filter(|c| c.len() >= MIN_CONTOUR_POINTS)
        .collect();
    let kept_points: usize = simplified.iter().map(Contour::len).sum();

    debug!(
        rank = region.rank,
        color = %region.color,
        pixels = region.pixel_count(),
        contours = simplified.len(),
        raw_points,
        kept_points,
        "traced region"
    );

    (!simplified.is_empty()).then(|| PathEntry::new(region.color, simplified))
}

#[cfg(not(feature = "parallel"))]
fn trace_regions(
    regions: &[Region],
    tolerance: f64,
    cancel: Option<&AtomicBool>,
) -> TraceResult<Vec<PathEntry>> {
    let mut paths = Vec::with_capacity(regions.len());
    for region in regions {
        check_cancel(cancel)?;
        if let Some(entry) = trace_region(region, tolerance) {
            paths.push(entry);
        }
    }
    Ok(paths)
}

#[cfg(feature = "parallel")]
fn trace_regions(
    regions: &[Region],
    tolerance: f64,
    cancel: Option<&AtomicBool>,
) -> TraceResult<Vec<PathEntry>> {
    use rayon::prelude::*;

    let traced = regions
        .par_iter()
        .map(|region| {
            check_cancel(cancel)?;
            Ok(trace_region(region, tolerance))
        })
        .collect::<TraceResult<Vec<_>>>()?;
    Ok(traced.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::contour::Point;

    mod trace_document {
        use super::*;

        #[test]
        fn invalid_options_fail_before_scanning() {
            let buffer = PixelBuffer::from_pixel(2, 2, Color::opaque(0, 0, 0)).unwrap();
            let options = TraceOptions::default().with_simplify_tolerance(-1.0);
            let err = trace_document(&buffer, &options, None).unwrap_err();
            assert!(matches!(err, TraceError::InvalidConfiguration { .. }));
        }

        #[test]
        fn solid_square_becomes_one_rectangle() {
            let buffer = PixelBuffer::from_pixel(10, 10, Color::opaque(30, 30, 30)).unwrap();
            let doc = trace_document(&buffer, &TraceOptions::default(), None).unwrap();
            assert_eq!(doc.paths.len(), 1);
            assert_eq!(doc.paths[0].color, Color::opaque(30, 30, 30));
            assert_eq!(doc.paths[0].contours.len(), 1);
            assert_eq!(
                doc.paths[0].contours[0].points(),
                &[
                    Point::new(0, 0),
                    Point::new(9, 0),
                    Point::new(9, 9),
                    Point::new(0, 9),
                    Point::new(0, 1),
                ]
            );
        }

        #[test]
        fn speckles_leave_no_path() {
            // An isolated pixel traces to a single point and is dropped.
            let buffer = PixelBuffer::from_fn(5, 5, |x, y| {
                if (x, y) == (2, 2) {
                    Color::opaque(0, 0, 0)
                } else {
                    Color::rgba(0, 0, 0, 0)
                }
            })
            .unwrap();
            let doc = trace_document(&buffer, &TraceOptions::default(), None).unwrap();
            assert!(doc.paths.is_empty());
        }

        #[test]
        fn collapsed_contours_are_dropped() {
            // The diagonal walks out and back as (0,0) (1,1) (2,2) (1,1), which
            // simplifies to the two points of the (0,0)-(1,1) chord.
            let buffer = PixelBuffer::from_fn(3, 3, |x, y| {
                if x == y {
                    Color::opaque(0, 0, 0)
                } else {
                    Color::rgba(0, 0, 0, 0)
                }
            })
            .unwrap();
            let doc = trace_document(&buffer, &TraceOptions::default(), None).unwrap();
            assert!(doc.paths.is_empty());
        }

        #[test]
        fn two_blocks_render_to_fixed_svg() {
            // Region order is kept whether or not regions are traced in parallel.
            let buffer = PixelBuffer::from_fn(10, 10, |_, y| {
                if y < 5 {
                    Color::opaque(60, 60, 60)
                } else {
                    Color::opaque(90, 90, 90)
                }
            })
            .unwrap();
            let svg = trace_document(&buffer, &TraceOptions::default(), None)
                .unwrap()
                .to_svg_string();
            assert_eq!(
                svg,
                concat!(
                    r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">"#,
                    "\n",
                    r#"  <path d="M0 0 L9 0 L9 4 L0 4 L0 1 Z" fill="rgb(60,60,60)"/>"#,
                    "\n",
                    r#"  <path d="M0 5 L9 5 L9 9 L0 9 L0 6 Z" fill="rgb(90,90,90)"/>"#,
                    "\n",
                    "</svg>",
                )
            );
        }

        #[test]
        fn cancelled_flag_stops_the_pipeline() {
            let buffer = PixelBuffer::from_pixel(4, 4, Color::opaque(0, 0, 0)).unwrap();
            let cancel = AtomicBool::new(true);
            let err = trace_document(&buffer, &TraceOptions::default(), Some(&cancel)).unwrap_err();
            assert!(matches!(err, TraceError::Cancelled));
        }

        #[test]
        fn unset_flag_does_not_cancel() {
            let buffer = PixelBuffer::from_pixel(4, 4, Color::opaque(0, 0, 0)).unwrap();
            let cancel = AtomicBool::new(false);
            let doc = PolygonVectorizer
                .vectorize_with_cancel(&buffer, &TraceOptions::default(), &cancel)
                .unwrap();
            assert_eq!(doc.paths.len(), 1);
        }
    }
}
