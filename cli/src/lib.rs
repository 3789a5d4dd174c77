use std::fs;
use std::path::{Path, PathBuf};

use detection::{Detections, Stage};
use image::{RgbImage, imageops::FilterType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// File extensions picked up when scanning an input directory
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ImageError(#[from] image::ImageError),
    #[error("No images found at {0:?}")]
    NoImages(PathBuf),
    #[error("Unsupported image format {0:?}. Please use jpg, jpeg, png or bmp files")]
    UnsupportedImageFormat(PathBuf),
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files under `input` sorted by file name, at most `limit` of them.
///
/// A single file is returned as-is when its extension is supported.
pub fn collect_image_paths(input: &Path, limit: usize) -> Result<Vec<PathBuf>, CliError> {
    if input.is_file() {
        if !has_image_extension(input) {
            return Err(CliError::UnsupportedImageFormat(input.to_path_buf()));
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths.truncate(limit);

    if paths.is_empty() {
        return Err(CliError::NoImages(input.to_path_buf()));
    }
    Ok(paths)
}

/// Shrink both sides by `factor`, never below one pixel. A factor of 0 or 1 copies.
pub fn downscale(image: &RgbImage, factor: u32) -> RgbImage {
    if factor <= 1 {
        return image.clone();
    }
    let width = (image.width() / factor).max(1);
    let height = (image.height() / factor).max(1);
    image::imageops::resize(image, width, height, FilterType::Triangle)
}

/// Load every path as RGB and downscale it.
pub fn load_images(paths: &[PathBuf], factor: u32) -> Result<Vec<RgbImage>, CliError> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let image = image::open(path)?.to_rgb8();
        debug!("Loaded {:?} ({}x{})", path, image.width(), image.height());
        images.push(downscale(&image, factor));
    }
    Ok(images)
}

/// `<output_dir>/<stem>_<stage>.png`
pub fn output_path(output_dir: &Path, source: &Path, stage: Stage) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| {
            warn!("No file stem for {:?}, using 'image'", source);
            "image".to_string()
        });
    output_dir.join(format!("{stem}_{stage}.png"))
}

/// Every stage of one batch run, keyed back to the input files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionReport {
    pub images: Vec<String>,
    pub detections: Detections,
}

impl DetectionReport {
    pub fn new(paths: &[PathBuf], detections: Detections) -> Self {
        Self {
            images: paths.iter().map(|path| path.to_string_lossy().into_owned()).collect(),
            detections,
        }
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
