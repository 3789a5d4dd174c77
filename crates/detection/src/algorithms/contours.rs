use image::GrayImage;
use tracing::trace;
use crate::{
    algorithms::geometry::{convex_hull, min_area_rect},
    error::Result,
    traits::ContourExtractor,
    types::{Contour, Point},
};

/// Neighbour priority of the boundary walk as `(d_row, d_col)`:
/// W, SW, S, SE, E, NE, N, NW.
const WALK_DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const FOUR_NEIGHBOURS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Orientation the shape channel is tuned for, in degrees.
pub const PREFERRED_ANGLE: f64 = 45.0;

/// Boundary tracer keeping contours oriented near 45 degrees
#[derive(Debug, Clone)]
pub struct BoundaryContourTracer {
    /// Allowed deviation from 45 degrees
    pub angle_tolerance: f64,
}

impl Default for BoundaryContourTracer {
    fn default() -> Self {
        Self {
            angle_tolerance: 15.0,
        }
    }
}

impl ContourExtractor for BoundaryContourTracer {
    fn extract_contours(&self, edges: &GrayImage) -> Result<Vec<Contour>> {
        find_oriented_contours(edges, self.angle_tolerance)
    }
}

fn is_foreground(image: &GrayImage, row: i32, col: i32) -> bool {
    image.get_pixel(col as u32, row as u32)[0] != 0
}

/// Foreground pixel with at least one in-image background 4-neighbour.
pub fn is_boundary(image: &GrayImage, row: i32, col: i32) -> bool {
    let (width, height) = (image.width() as i32, image.height() as i32);
    if row < 0 || row >= height || col < 0 || col >= width || !is_foreground(image, row, col) {
        return false;
    }

    FOUR_NEIGHBOURS.iter().any(|&(dr, dc)| {
        let (r, c) = (row + dr, col + dc);
        r >= 0 && r < height && c >= 0 && c < width && !is_foreground(image, r, c)
    })
}

/// Single-branch walk from `start`: at every step only the first unvisited
/// boundary neighbour is followed, so junctions truncate the chain.
pub fn trace_contour(image: &GrayImage, visited: &mut [bool], start: Point) -> Contour {
    let width = image.width() as i32;
    let index = |p: Point| (p.row * width + p.col) as usize;

    let mut contour = Vec::new();
    let mut stack = vec![start];
    visited[index(start)] = true;

    while let Some(p) = stack.pop() {
        contour.push(p);

        let next = WALK_DIRECTIONS
            .iter()
            .map(|&(dr, dc)| Point::new(p.row + dr, p.col + dc))
            .find(|&n| is_boundary(image, n.row, n.col) && !visited[index(n)]);

        if let Some(n) = next {
            visited[index(n)] = true;
            stack.push(n);
        }
    }

    contour
}

/// Every traced boundary chain of `image`, unfiltered.
///
/// Seeds are taken from the image interior only; a walk may still step
/// onto the outermost rows and columns.
pub fn trace_contours(image: &GrayImage) -> Vec<Contour> {
    let (width, height) = (image.width() as i32, image.height() as i32);
    let mut visited = vec![false; image.width() as usize * image.height() as usize];
    let mut contours = Vec::new();

    for row in 1..height - 1 {
        for col in 1..width - 1 {
            if !visited[(row * width + col) as usize] && is_boundary(image, row, col) {
                contours.push(trace_contour(image, &mut visited, Point::new(row, col)));
            }
        }
    }

    contours
}

/// Traced contours whose minimum-area rectangle lies within
/// `angle_tolerance` degrees of 45.
pub fn find_oriented_contours(image: &GrayImage, angle_tolerance: f64) -> Result<Vec<Contour>> {
    let mut kept = Vec::new();

    for contour in trace_contours(image) {
        if contour.len() < 3 {
            trace!(len = contour.len(), "discarding short contour");
            continue;
        }
        if convex_hull(&contour).len() < 3 {
            trace!(len = contour.len(), "discarding contour with degenerate hull");
            continue;
        }

        let angle = min_area_rect(&contour)?.folded_angle();
        if (angle - PREFERRED_ANGLE).abs() <= angle_tolerance {
            kept.push(contour);
        } else {
            trace!(angle, "discarding contour outside orientation tolerance");
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn filled_square(size: u32, top: u32, side: u32) -> GrayImage {
        let mut img = GrayImage::new(size, size);
        for y in top..top + side {
            for x in top..top + side {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        img
    }

    fn filled_diamond(size: u32, center: i32, radius: i32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            let d = (x as i32 - center).abs() + (y as i32 - center).abs();
            Luma([if d <= radius { 255 } else { 0 }])
        })
    }

    #[test]
    fn test_boundary_pixels() {
        let img = filled_square(10, 2, 6);
        assert!(is_boundary(&img, 2, 2));
        assert!(is_boundary(&img, 2, 5));
        assert!(!is_boundary(&img, 4, 4), "interior pixel");
        assert!(!is_boundary(&img, 0, 0), "background pixel");
        assert!(!is_boundary(&img, -1, 3), "outside image");
    }

    #[test]
    fn test_square_ring_is_traced_whole() {
        let img = filled_square(10, 2, 6);
        let contours = trace_contours(&img);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 20);
        assert_eq!(contours[0][0], Point::new(2, 2));
        assert_eq!(contours[0][1], Point::new(3, 2));
    }

    #[test]
    fn test_axis_aligned_square_is_filtered_out() {
        let img = filled_square(10, 2, 6);
        let contours = find_oriented_contours(&img, 15.0).expect("Should trace");
        assert!(contours.is_empty());
    }

    #[test]
    fn test_diamond_is_kept() {
        let img = filled_diamond(21, 10, 5);
        let contours = find_oriented_contours(&img, 15.0).expect("Should trace");
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 20);
        assert_eq!(contours[0][0], Point::new(5, 10));
    }

    #[test]
    fn test_short_contours_are_dropped() {
        let mut img = GrayImage::new(6, 6);
        img.put_pixel(2, 2, Luma([255]));
        img.put_pixel(3, 2, Luma([255]));

        assert_eq!(trace_contours(&img).len(), 1);
        let contours = find_oriented_contours(&img, 90.0).expect("Should trace");
        assert!(contours.is_empty());
    }

    #[test]
    fn test_junction_truncates_walk() {
        // A plus sign: the walk from the top arm cannot cover every arm.
        let mut img = GrayImage::new(9, 9);
        for i in 2..=6 {
            img.put_pixel(4, i, Luma([255]));
            img.put_pixel(i, 4, Luma([255]));
        }
        let contours = trace_contours(&img);
        let traced: usize = contours.iter().map(Vec::len).sum();
        // The centre pixel has no background neighbour.
        assert_eq!(traced, 8, "every boundary pixel is visited exactly once");
        assert_eq!(contours.len(), 3);
        assert_eq!(
            contours[0],
            vec![
                Point::new(2, 4),
                Point::new(3, 4),
                Point::new(4, 3),
                Point::new(4, 2),
            ]
        );
    }

    #[test]
    fn test_empty_edge_map() {
        let img = GrayImage::new(5, 5);
        assert!(find_oriented_contours(&img, 15.0).expect("Should trace").is_empty());
    }
}
