//! # Candidate Region Detection
//!
//! Locates rectangular-ish candidate regions in images from two independent
//! cues, strong-color regions and diagonally oriented edge shapes, and fuses
//! both channels into one consolidated set of labelled boxes.
//!
//! ## Core Features
//!
//! - **Connected components**: stack-based 4-connected blob extraction
//! - **Boundary tracing**: single-branch contour walk with a 45° orientation filter
//! - **Geometry**: convex hull, Douglas-Peucker approximation, rotating calipers
//! - **Box model**: area and aspect-ratio gates, shape classification
//! - **Fusion & merge**: cross-channel pairing and per-image duplicate clustering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use detection::{DetectionConfig, DetectionPipeline, Stage, render};
//!
//! let pipeline = DetectionPipeline::from_config(DetectionConfig::default());
//!
//! let mut images = vec![image::open("frame.png")?.to_rgb8()];
//! let detections = pipeline.process(&images)?;
//!
//! render(detections.boxes(Stage::Fused), &mut images)?;
//! images[0].save("frame_boxes.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use detection::{DetectionPipeline, BoxColor, Hsv, algorithms::*};
//!
//! let pipeline = DetectionPipeline::builder()
//!     .add_color_preprocessor(MedianBlurPreprocessor { radius: 1 })
//!     .add_color_channel(BoxColor::RED, StrongColor::Red)
//!     .add_color_channel(BoxColor::GREEN, |hsv: Hsv| hsv.h > 90.0 && hsv.h < 150.0)
//!     .add_edge_preprocessor(SobelMagnitudePreprocessor)
//!     .add_edge_preprocessor(ThresholdPreprocessor { threshold: 40 })
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod config;
pub mod pipeline;

// Re-exports for convenience
pub use error::{DetectionError, Result};
pub use types::{BoundingBox, BoxColor, Blob, Contour, Corners, Hsv, Point, RotatedRect, ShapeKind, Stage};
pub use traits::*;
pub use algorithms::*;
pub use config::DetectionConfig;
pub use pipeline::{DetectionPipeline, Detections, builder::PipelineBuilder, render};
