use geo::{ConvexHull, Simplify};
use geo_types::{Coord, LineString, MultiPoint};
use crate::{
    error::{DetectionError, Result},
    types::{Point, RotatedRect},
};

/// Tolerance of the shape polygon approximation, relative to the perimeter.
pub const SHAPE_APPROXIMATION_FACTOR: f64 = 0.02;

fn to_coord(p: &Point) -> Coord<f64> {
    Coord {
        x: p.col as f64,
        y: p.row as f64,
    }
}

fn to_point(c: &Coord<f64>) -> Point {
    Point::new(c.y.round() as i32, c.x.round() as i32)
}

/// Strips the closing vertex geo appends to rings, plus repeated vertices.
fn open_ring(mut coords: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    coords.dedup();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

/// Convex hull vertices, counter-clockwise in `(x = col, y = row)` space,
/// without a repeated closing vertex. Collinear points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    convex_hull_coords(points).iter().map(to_point).collect()
}

fn convex_hull_coords(points: &[Point]) -> Vec<Coord<f64>> {
    if points.is_empty() {
        return Vec::new();
    }
    let multi_point: MultiPoint<f64> = points.iter().map(to_coord).collect::<Vec<_>>().into();
    let hull = multi_point.convex_hull();
    open_ring(hull.exterior().coords().copied().collect())
}

/// Minimum-area oriented rectangle by rotating calipers over the hull edges.
///
/// Fails with `InvalidArgument` for fewer than 3 points or a hull with
/// fewer than 3 vertices.
pub fn min_area_rect(points: &[Point]) -> Result<RotatedRect> {
    if points.len() < 3 {
        return Err(DetectionError::invalid(format!(
            "minimum-area rectangle needs at least 3 points, got {}",
            points.len()
        )));
    }

    let hull = convex_hull_coords(points);
    if hull.len() < 3 {
        return Err(DetectionError::invalid(format!(
            "convex hull is degenerate ({} vertices)",
            hull.len()
        )));
    }

    let mut best: Option<RotatedRect> = None;

    for (i, p1) in hull.iter().enumerate() {
        let p2 = hull[(i + 1) % hull.len()];
        let theta = (p2.y - p1.y).atan2(p2.x - p1.x);
        let (sin, cos) = theta.sin_cos();

        // Rotate by -theta so the edge lies along the x axis.
        let mut min = [f64::MAX, f64::MAX];
        let mut max = [f64::MIN, f64::MIN];
        for c in &hull {
            let x = c.x * cos + c.y * sin;
            let y = -c.x * sin + c.y * cos;
            min = [min[0].min(x), min[1].min(y)];
            max = [max[0].max(x), max[1].max(y)];
        }

        let width = max[0] - min[0];
        let height = max[1] - min[1];
        if best.is_some_and(|b| b.area() <= width * height) {
            continue;
        }

        let cx = (min[0] + max[0]) / 2.0;
        let cy = (min[1] + max[1]) / 2.0;
        best = Some(RotatedRect {
            center: [cx * cos - cy * sin, cx * sin + cy * cos],
            width,
            height,
            angle: -theta.to_degrees(),
        });
    }

    best.ok_or_else(|| DetectionError::invalid("convex hull has no edges"))
}

/// Length of the closed polygon through `points`.
pub fn closed_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| {
            let dr = (b.row - a.row) as f64;
            let dc = (b.col - a.col) as f64;
            (dr * dr + dc * dc).sqrt()
        })
        .sum()
}

/// Douglas-Peucker approximation of the closed polygon through `points`.
///
/// The returned vertices do not repeat the first vertex at the end.
pub fn approximate_polygon(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut coords: Vec<Coord<f64>> = points.iter().map(to_coord).collect();
    coords.push(coords[0]);
    let simplified = LineString::new(coords).simplify(&tolerance);

    open_ring(simplified.coords().copied().collect())
        .iter()
        .map(to_point)
        .collect()
}

/// Approximation with a tolerance of 2% of the closed perimeter.
pub fn approximate_shape(points: &[Point]) -> Vec<Point> {
    approximate_polygon(points, SHAPE_APPROXIMATION_FACTOR * closed_perimeter(points))
}
