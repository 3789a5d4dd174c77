pub mod boxes;
pub mod colors;
pub mod contours;
pub mod extraction;
pub mod fusion;
pub mod geometry;
pub mod preprocessing;

pub use boxes::*;
pub use colors::*;
pub use contours::*;
pub use extraction::*;
pub use fusion::*;
pub use geometry::*;
pub use preprocessing::*;
