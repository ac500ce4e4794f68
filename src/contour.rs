use tracing::warn;

use crate::region::Bitmap;

/// Offsets of the eight neighbours, clockwise on screen starting east (y grows down).
const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
/// North, east, south, west.
const DIRS_C4: [usize; 4] = [6, 0, 2, 4];

/// Contours shorter than this are dropped.
pub const MIN_CONTOUR_POINTS: usize = 3;

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A closed polyline; the edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Mark every set pixel that borders a clear pixel.
///
/// Each pixel is compared with its right and bottom neighbours; a transition
/// marks whichever side of the pair is set. Scanning starts one column and one
/// row outside the frame so that left and top edges are caught as well.
pub fn boundary_pixels(mask: &Bitmap) -> Bitmap {
    let (w, h) = (mask.width() as isize, mask.height() as isize);
    let mut boundary = Bitmap::new(mask.width(), mask.height());

    for y in -1..h {
        for x in -1..w {
            let here = mask.get(x, y);
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                let there = mask.get(nx, ny);
                if here == there {
                    continue;
                }
                let (sx, sy) = if here { (x, y) } else { (nx, ny) };
                boundary.set(sy as usize * mask.width() + sx as usize);
            }
        }
    }

    boundary
}

/// Extract one closed contour per boundary walk over a region mask.
///
/// Walks start at unvisited boundary pixels in raster order. Every walk is
/// bounded by `width * height` steps; a walk that hits the bound is kept as a
/// partial contour. Nested boundaries are returned as separate contours.
pub fn trace_contours(mask: &Bitmap) -> Vec<Contour> {
    let boundary = boundary_pixels(mask);
    let mut visited = Bitmap::new(mask.width(), mask.height());
    let max_steps = mask.len();
    let mut contours = Vec::new();

    for start in boundary.iter() {
        if visited.contains(start) {
            continue;
        }

        let walk = moore_walk(mask, &boundary, start, max_steps);
        for p in &walk.points {
            visited.set(p.y as usize * mask.width() + p.x as usize);
        }
        if walk.truncated {
            warn!(
                start_x = walk.points[0].x,
                start_y = walk.points[0].y,
                points = walk.points.len(),
                "boundary walk hit the step bound, keeping partial contour"
            );
        }
        if walk.points.len() >= MIN_CONTOUR_POINTS {
            contours.push(Contour::new(walk.points));
        }
    }

    contours
}

struct Walk {
    points: Vec<Point>,
    truncated: bool,
}

/// Follow the boundary from `start` until it returns there or `max_steps` runs out.
///
/// At each pixel the eight neighbours are scanned clockwise, beginning 90
/// degrees left of the heading, and the walk moves to the first boundary pixel.
fn moore_walk(mask: &Bitmap, boundary: &Bitmap, start: usize, max_steps: usize) -> Walk {
    let width = mask.width();
    let (sx, sy) = ((start % width) as isize, (start / width) as isize);
    let mut points = vec![Point::new(sx as i32, sy as i32)];
    let (mut cx, mut cy) = (sx, sy);
    let mut heading = initial_heading(mask, sx, sy);
    let mut steps = 0;

    loop {
        if steps >= max_steps {
            return Walk {
                points,
                truncated: true,
            };
        }
        steps += 1;

        let first = (heading + 6) % 8;
        let next = (0..8)
            .map(|k| (first + k) % 8)
            .find(|&d| boundary.get(cx + DX[d], cy + DY[d]));
        let Some(dir) = next else {
            break;
        };

        cx += DX[dir];
        cy += DY[dir];
        heading = dir;
        if (cx, cy) == (sx, sy) {
            break;
        }
        points.push(Point::new(cx as i32, cy as i32));
    }

    Walk {
        points,
        truncated: false,
    }
}

/// Pick a heading whose first scanned neighbour is a clear 4-neighbour of the start.
fn initial_heading(mask: &Bitmap, x: isize, y: isize) -> usize {
    DIRS_C4
        .iter()
        .find(|&&d| !mask.get(x + DX[d], y + DY[d]))
        .map(|&d| (d + 2) % 8)
        .unwrap_or(0)
}
