use image::Rgb;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Integer pixel coordinate, row grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// One 4-connected foreground component of a mask.
pub type Blob = Vec<Point>;

/// A chain of boundary pixels produced by walking an edge map.
pub type Contour = Vec<Point>;

/// Inclusive axis-aligned rectangle, `top <= bottom` and `left <= right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Corners {
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Tightest rectangle enclosing `points`, `None` when there are none.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut corners = Self::new(first.row, first.col, first.row, first.col);
        for p in &points[1..] {
            corners.top = corners.top.min(p.row);
            corners.bottom = corners.bottom.max(p.row);
            corners.left = corners.left.min(p.col);
            corners.right = corners.right.max(p.col);
        }
        Some(corners)
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    pub fn area(&self) -> i64 {
        self.height() as i64 * self.width() as i64
    }

    /// Integer midpoint of the rectangle.
    pub fn midpoint(&self) -> Point {
        Point::new((self.top + self.bottom) / 2, (self.left + self.right) / 2)
    }
}

/// Color tag recording which detection evidence produced a box (RGB order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxColor(pub [u8; 3]);

impl BoxColor {
    /// Neutral tag meaning "no channel-specific color".
    pub const UNSET: Self = Self([255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0]);
    pub const GREEN: Self = Self([0, 255, 0]);
    pub const BLUE: Self = Self([0, 0, 255]);
    pub const YELLOW: Self = Self([255, 255, 0]);

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

impl Default for BoxColor {
    fn default() -> Self {
        Self::UNSET
    }
}

impl From<BoxColor> for Rgb<u8> {
    fn from(color: BoxColor) -> Self {
        Rgb(color.0)
    }
}

/// Shape label derived from the simplified vertex count of a contour.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShapeKind {
    Unknown,
    Triangle,
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub fn from_vertex_count(vertices: usize) -> Self {
        match vertices {
            0..=2 => Self::Unknown,
            3 => Self::Triangle,
            4 => Self::Rectangle,
            _ => Self::Circle,
        }
    }
}

/// Axis-aligned candidate region with the evidence that produced it.
///
/// Height, width and area are always derived from `corners`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Point,
    pub corners: Corners,
    pub color: BoxColor,
    pub shape: Option<ShapeKind>,
    /// Index of the image this box was derived from.
    pub owner_index: usize,
}

impl BoundingBox {
    pub fn height(&self) -> i32 {
        self.corners.height()
    }

    pub fn width(&self) -> i32 {
        self.corners.width()
    }

    pub fn area(&self) -> i64 {
        self.corners.area()
    }

    /// `max(w/h, h/w)` of the rectangle.
    pub fn aspect_ratio(&self) -> f64 {
        let width = self.width() as f64;
        let height = self.height() as f64;
        (width / height).max(height / width)
    }
}

/// Result of the rotating-calipers search, in image coordinates
/// (`center` is `[col, row]`, `angle` in degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRect {
    pub center: [f64; 2],
    pub width: f64,
    pub height: f64,
    pub angle: f64,
}

impl RotatedRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Angle folded into `[0, 90]` degrees.
    pub fn folded_angle(&self) -> f64 {
        let angle = (self.angle % 180.0).abs();
        if angle > 90.0 { 180.0 - angle } else { angle }
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Which set of boxes a caller wants to look at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Color,
    Shape,
    #[default]
    Fused,
}
