use crate::{
    algorithms::{
        BoundaryContourTracer, BoxBlurPreprocessor, ColorChannel, FloodFillBlobExtractor,
        MedianBlurPreprocessor, SobelMagnitudePreprocessor, ThresholdPreprocessor,
    },
    config::DetectionConfig,
    pipeline::DetectionPipeline,
    traits::{BlobExtractor, ColorPredicate, ColorPreprocessor, ContourExtractor, ImagePreprocessor},
    types::BoxColor,
};

/// Builder for detection pipelines with a fluent API
pub struct PipelineBuilder {
    color_preprocessors: Vec<Box<dyn ColorPreprocessor>>,
    edge_preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    color_channels: Vec<ColorChannel>,
    blob_extractor: Option<Box<dyn BlobExtractor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    config: DetectionConfig,
}

impl PipelineBuilder {
    /// Empty builder: no preprocessing, no color channels, default tuning
    pub fn new() -> Self {
        Self {
            color_preprocessors: Vec::new(),
            edge_preprocessors: Vec::new(),
            color_channels: Vec::new(),
            blob_extractor: None,
            contour_extractor: None,
            config: DetectionConfig::default(),
        }
    }

    /// Builder preloaded with the stock preprocessing and the configured colors
    pub fn from_config(config: DetectionConfig) -> Self {
        let mut builder = Self::new()
            .add_color_preprocessor(MedianBlurPreprocessor {
                radius: config.median_radius,
            })
            .add_edge_preprocessor(BoxBlurPreprocessor {
                radius: config.blur_radius,
            })
            .add_edge_preprocessor(SobelMagnitudePreprocessor)
            .add_edge_preprocessor(ThresholdPreprocessor {
                threshold: config.edge_threshold,
            });

        for color in &config.colors {
            builder.color_channels.push(color.channel());
        }
        builder.with_config(config)
    }

    /// Add a preprocessor applied to the color image before masking
    pub fn add_color_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ColorPreprocessor + 'static,
    {
        self.color_preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Add a preprocessor applied to the grayscale image of the shape channel
    pub fn add_edge_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.edge_preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Add a color predicate whose boxes are stamped with `tag`
    pub fn add_color_channel<P>(mut self, tag: BoxColor, predicate: P) -> Self
    where
        P: ColorPredicate + 'static,
    {
        self.color_channels.push(ColorChannel::new(tag, predicate));
        self
    }

    /// Set the blob extractor (replaces any existing one)
    pub fn set_blob_extractor<E>(mut self, extractor: E) -> Self
    where
        E: BlobExtractor + 'static,
    {
        self.blob_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the pipeline, filling in the stock extractors if not specified
    pub fn build(self) -> DetectionPipeline {
        let blob_extractor = self
            .blob_extractor
            .unwrap_or_else(|| Box::new(FloodFillBlobExtractor));

        let angle_tolerance = self.config.angle_tolerance;
        let contour_extractor = self
            .contour_extractor
            .unwrap_or_else(|| Box::new(BoundaryContourTracer { angle_tolerance }));

        DetectionPipeline::new(
            self.color_preprocessors,
            self.edge_preprocessors,
            self.color_channels,
            blob_extractor,
            contour_extractor,
            self.config,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
