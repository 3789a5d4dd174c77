use image::{GrayImage, RgbImage};
use crate::{error::Result, types::{Blob, Contour, Hsv}};

/// Trait for single-channel preprocessing steps (blur, gradient, threshold)
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the input image
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for preprocessing applied to the color image before masking
pub trait ColorPreprocessor: Send + Sync {
    fn preprocess(&self, image: &RgbImage) -> Result<RgbImage>;
}

/// Opaque boolean test over an HSV triple
pub trait ColorPredicate: Send + Sync {
    fn matches(&self, hsv: Hsv) -> bool;
}

impl<F> ColorPredicate for F
where
    F: Fn(Hsv) -> bool + Send + Sync,
{
    fn matches(&self, hsv: Hsv) -> bool {
        self(hsv)
    }
}

/// Trait for turning a binary mask into pixel blobs
pub trait BlobExtractor: Send + Sync {
    fn extract_blobs(&self, mask: &GrayImage) -> Result<Vec<Blob>>;
}

/// Trait for turning a binary edge map into contours
pub trait ContourExtractor: Send + Sync {
    fn extract_contours(&self, edges: &GrayImage) -> Result<Vec<Contour>>;
}
