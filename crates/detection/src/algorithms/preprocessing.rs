use image::{GrayImage, Luma, RgbImage};
use crate::{error::Result, traits::{ColorPreprocessor, ImagePreprocessor}};

/// Binary threshold: pixels brighter than `threshold` become 255
#[derive(Debug, Clone)]
pub struct ThresholdPreprocessor {
    pub threshold: u8,
}

impl Default for ThresholdPreprocessor {
    fn default() -> Self {
        Self { threshold: 30 }
    }
}

impl ImagePreprocessor for ThresholdPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::contrast::threshold(image, self.threshold))
    }
}

/// Mean filter over a `(2r+1)²` window
#[derive(Debug, Clone)]
pub struct BoxBlurPreprocessor {
    pub radius: u32,
}

impl Default for BoxBlurPreprocessor {
    fn default() -> Self {
        Self { radius: 2 }
    }
}

impl ImagePreprocessor for BoxBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::filter::box_filter(image, self.radius, self.radius))
    }
}

/// Sobel gradient magnitude, saturated to 255
#[derive(Debug, Clone, Default)]
pub struct SobelMagnitudePreprocessor;

impl ImagePreprocessor for SobelMagnitudePreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        let gradients = imageproc::gradients::sobel_gradients(image);
        Ok(imageproc::map::map_colors(&gradients, |Luma([magnitude])| {
            Luma([magnitude.min(u8::MAX as u16) as u8])
        }))
    }
}

/// Median filter applied per channel before color masking
#[derive(Debug, Clone)]
pub struct MedianBlurPreprocessor {
    pub radius: u32,
}

impl Default for MedianBlurPreprocessor {
    fn default() -> Self {
        Self { radius: 2 }
    }
}

impl ColorPreprocessor for MedianBlurPreprocessor {
    fn preprocess(&self, image: &RgbImage) -> Result<RgbImage> {
        Ok(imageproc::filter::median_filter(image, self.radius, self.radius))
    }
}
