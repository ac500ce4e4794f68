use crate::contour::{Contour, Point};

/// Perpendicular distance from `p` to the line through `a` and `b`.
/// Falls back to the distance from `a` when the chord has no length.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (f64::from(b.x - a.x), f64::from(b.y - a.y));
    let (px, py) = (f64::from(p.x - a.x), f64::from(p.y - a.y));
    let chord = dx.hypot(dy);
    if chord == 0.0 {
        return px.hypot(py);
    }
    (px * dy - py * dx).abs() / chord
}

/// Ramer–Douglas–Peucker simplification of an open polyline.
///
/// The first and last points are always kept. Segments are processed from an
/// explicit work stack, so very long inputs cannot exhaust the call stack.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let end = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[end] = true;

    let mut stack = vec![(0, end)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let mut index = first;
        let mut max_distance = 0.0;
        for (i, p) in points.iter().enumerate().take(last).skip(first + 1) {
            let d = perpendicular_distance(*p, points[first], points[last]);
            if d > max_distance {
                max_distance = d;
                index = i;
            }
        }

        if index != first && max_distance > tolerance {
            keep[index] = true;
            stack.push((index, last));
            stack.push((first, index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Simplify a contour, treating its point list as an open polyline.
pub fn simplify_contour(contour: &Contour, tolerance: f64) -> Contour {
    Contour::new(simplify(contour.points(), tolerance))
}
