pub mod builder;

use image::{DynamicImage, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::{
    algorithms::{
        ColorChannel, as_mask, color_mask, draw_box, fuse, make_boxes, make_contour_boxes,
        merge_duplicates,
    },
    config::DetectionConfig,
    error::{DetectionError, Result},
    traits::{BlobExtractor, ColorPreprocessor, ContourExtractor, ImagePreprocessor},
    types::{BoundingBox, BoxColor, Stage},
};

/// Boxes produced by one batch run, one list per stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detections {
    pub color_boxes: Vec<BoundingBox>,
    pub shape_boxes: Vec<BoundingBox>,
    pub fused_boxes: Vec<BoundingBox>,
}

impl Detections {
    pub fn boxes(&self, stage: Stage) -> &[BoundingBox] {
        match stage {
            Stage::Color => &self.color_boxes,
            Stage::Shape => &self.shape_boxes,
            Stage::Fused => &self.fused_boxes,
        }
    }
}

/// Color and shape detection over a batch of images, fused into one box set
pub struct DetectionPipeline {
    color_preprocessors: Vec<Box<dyn ColorPreprocessor>>,
    edge_preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    color_channels: Vec<ColorChannel>,
    blob_extractor: Box<dyn BlobExtractor>,
    contour_extractor: Box<dyn ContourExtractor>,
    config: DetectionConfig,
}

impl DetectionPipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Pipeline with the stock preprocessing and channels described by `config`
    pub fn from_config(config: DetectionConfig) -> Self {
        builder::PipelineBuilder::from_config(config).build()
    }

    pub fn new(
        color_preprocessors: Vec<Box<dyn ColorPreprocessor>>,
        edge_preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        color_channels: Vec<ColorChannel>,
        blob_extractor: Box<dyn BlobExtractor>,
        contour_extractor: Box<dyn ContourExtractor>,
        config: DetectionConfig,
    ) -> Self {
        Self {
            color_preprocessors,
            edge_preprocessors,
            color_channels,
            blob_extractor,
            contour_extractor,
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Unmerged color-channel boxes of one image
    pub fn detect_color_boxes(&self, image: &RgbImage, owner_index: usize) -> Result<Vec<BoundingBox>> {
        let mut prepared = image.clone();
        for preprocessor in &self.color_preprocessors {
            prepared = preprocessor.preprocess(&prepared)?;
        }

        let limits = self.config.color_limits(image.width(), image.height());
        let mut boxes = Vec::new();
        for channel in &self.color_channels {
            let mask = color_mask(&prepared, channel.predicate.as_ref());
            let blobs = self.blob_extractor.extract_blobs(&mask)?;
            let found = make_boxes(&blobs, owner_index, limits, channel.tag);
            debug!(
                owner_index,
                tag = ?channel.tag,
                blobs = blobs.len(),
                boxes = found.len(),
                "color channel"
            );
            boxes.extend(found);
        }

        Ok(boxes)
    }

    /// Boxes of the blobs of an already thresholded single-channel mask,
    /// gated like color-channel boxes and stamped with `tag`.
    pub fn detect_mask_boxes(
        &self,
        mask: &DynamicImage,
        owner_index: usize,
        tag: BoxColor,
    ) -> Result<Vec<BoundingBox>> {
        let mask = as_mask(mask)?;
        let blobs = self.blob_extractor.extract_blobs(mask)?;
        let limits = self.config.color_limits(mask.width(), mask.height());
        Ok(make_boxes(&blobs, owner_index, limits, tag))
    }

    /// Binary edge map the shape channel traces
    pub fn edge_map(&self, image: &RgbImage) -> Result<GrayImage> {
        let mut edges = image::imageops::grayscale(image);
        for preprocessor in &self.edge_preprocessors {
            edges = preprocessor.preprocess(&edges)?;
        }
        Ok(edges)
    }

    /// Unmerged shape-channel boxes of one image
    pub fn detect_shape_boxes(&self, image: &RgbImage, owner_index: usize) -> Result<Vec<BoundingBox>> {
        let edges = self.edge_map(image)?;
        let contours = self.contour_extractor.extract_contours(&edges)?;
        let limits = self.config.shape_limits(image.width(), image.height());
        let boxes = make_contour_boxes(&contours, owner_index, limits, BoxColor::UNSET);
        debug!(
            owner_index,
            contours = contours.len(),
            boxes = boxes.len(),
            "shape channel"
        );
        Ok(boxes)
    }

    /// Run both channels on every image, merge each, then fuse and merge again.
    ///
    /// Box `owner_index` values are positions in `images`.
    pub fn process(&self, images: &[RgbImage]) -> Result<Detections> {
        let mut color_boxes = Vec::new();
        let mut shape_boxes = Vec::new();
        for (owner_index, image) in images.iter().enumerate() {
            color_boxes.extend(self.detect_color_boxes(image, owner_index)?);
            shape_boxes.extend(self.detect_shape_boxes(image, owner_index)?);
        }

        let color_boxes = merge_duplicates(&color_boxes, self.config.color_merge_deviation);
        let shape_boxes = merge_duplicates(&shape_boxes, self.config.shape_merge_deviation);
        let fused = fuse(&color_boxes, &shape_boxes, self.config.fusion_deviation);
        let fused_boxes = merge_duplicates(&fused, self.config.fused_merge_deviation);

        debug!(
            images = images.len(),
            color = color_boxes.len(),
            shape = shape_boxes.len(),
            fused = fused_boxes.len(),
            "batch processed"
        );

        Ok(Detections {
            color_boxes,
            shape_boxes,
            fused_boxes,
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} color preprocessors, {} color channels, {} edge preprocessors",
            self.color_preprocessors.len(),
            self.color_channels.len(),
            self.edge_preprocessors.len()
        )
    }
}

/// Draw every box into the image it belongs to.
pub fn render(boxes: &[BoundingBox], images: &mut [RgbImage]) -> Result<()> {
    let count = images.len();
    for bbox in boxes {
        let image = images.get_mut(bbox.owner_index).ok_or_else(|| {
            DetectionError::invalid(format!(
                "box owner index {} out of range for {count} images",
                bbox.owner_index
            ))
        })?;
        draw_box(bbox, image);
    }
    Ok(())
}
