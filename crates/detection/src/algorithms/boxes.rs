use image::RgbImage;
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use serde::{Deserialize, Serialize};
use tracing::trace;
use crate::{
    algorithms::geometry::approximate_shape,
    types::{BoundingBox, BoxColor, Corners, Point, ShapeKind},
};

/// Largest accepted `max(w/h, h/w)` of a candidate box.
pub const MAX_ASPECT_RATIO: f64 = 1.75;

/// Inclusive admission range for box areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaLimits {
    pub min: i64,
    pub max: i64,
}

impl AreaLimits {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, area: i64) -> bool {
        self.min <= area && area <= self.max
    }
}

/// Box around `points` if it passes the area and aspect-ratio gates.
///
/// The box carries no shape label; use [`make_contour_box`] for contours.
pub fn make_box(
    points: &[Point],
    owner_index: usize,
    limits: AreaLimits,
    color: BoxColor,
) -> Option<BoundingBox> {
    let corners = Corners::enclosing(points)?;
    let candidate = BoundingBox {
        center: corners.midpoint(),
        corners,
        color,
        shape: None,
        owner_index,
    };

    if !limits.contains(candidate.area()) {
        trace!(area = candidate.area(), ?limits, "rejecting box outside area limits");
        return None;
    }
    if candidate.aspect_ratio() > MAX_ASPECT_RATIO {
        trace!(
            height = candidate.height(),
            width = candidate.width(),
            "rejecting box with extreme aspect ratio"
        );
        return None;
    }

    Some(candidate)
}

/// Box around a traced contour, labelled with its approximated shape.
pub fn make_contour_box(
    contour: &[Point],
    owner_index: usize,
    limits: AreaLimits,
    color: BoxColor,
) -> Option<BoundingBox> {
    let mut bbox = make_box(contour, owner_index, limits, color)?;
    bbox.shape = Some(classify_shape(contour));
    Some(bbox)
}

/// Shape label from the vertex count of the approximated polygon.
pub fn classify_shape(contour: &[Point]) -> ShapeKind {
    ShapeKind::from_vertex_count(approximate_shape(contour).len())
}

pub fn make_boxes(
    blobs: &[Vec<Point>],
    owner_index: usize,
    limits: AreaLimits,
    color: BoxColor,
) -> Vec<BoundingBox> {
    blobs
        .iter()
        .filter_map(|blob| make_box(blob, owner_index, limits, color))
        .collect()
}

pub fn make_contour_boxes(
    contours: &[Vec<Point>],
    owner_index: usize,
    limits: AreaLimits,
    color: BoxColor,
) -> Vec<BoundingBox> {
    contours
        .iter()
        .filter_map(|contour| make_contour_box(contour, owner_index, limits, color))
        .collect()
}

/// Draws the border of `bbox` in its color.
///
/// Corners are clamped to the image first, since fused and merged boxes may
/// reach past the edges. Boxes lying entirely outside are skipped.
pub fn draw_box(bbox: &BoundingBox, image: &mut RgbImage) {
    let (width, height) = (image.width() as i32, image.height() as i32);
    let c = bbox.corners;
    if width == 0 || height == 0 || c.bottom < 0 || c.right < 0 || c.top >= height || c.left >= width {
        return;
    }

    let clamped = Corners::new(
        c.top.clamp(0, height - 1),
        c.left.clamp(0, width - 1),
        c.bottom.clamp(0, height - 1),
        c.right.clamp(0, width - 1),
    );
    let rect = Rect::at(clamped.left, clamped.top)
        .of_size(clamped.width() as u32, clamped.height() as u32);
    draw_hollow_rect_mut(image, rect, bbox.color.into());
}
