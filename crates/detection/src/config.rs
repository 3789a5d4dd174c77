use std::{fs, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::{
    algorithms::{AreaLimits, StrongColor},
    error::{DetectionError, Result},
};

/// Tuning of the batch detection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectionConfig {
    /// Smallest box side as a fraction of the image height
    #[schemars(range(min = 0.0, max = 1.0))]
    pub min_area_factor: f64,
    /// Largest color box as a fraction of the image area
    #[schemars(range(min = 0.0, max = 1.0))]
    pub color_max_area_fraction: f64,
    /// Largest shape box as a fraction of the image area
    #[schemars(range(min = 0.0, max = 1.0))]
    pub shape_max_area_fraction: f64,
    /// Color predicates run on every image, in order
    pub colors: Vec<StrongColor>,
    /// Allowed deviation of a contour from 45 degrees
    #[schemars(range(min = 0.0, max = 90.0))]
    pub angle_tolerance: f64,
    pub color_merge_deviation: i32,
    pub shape_merge_deviation: i32,
    pub fusion_deviation: i32,
    pub fused_merge_deviation: i32,
    pub median_radius: u32,
    pub blur_radius: u32,
    pub edge_threshold: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_area_factor: 0.055,
            color_max_area_fraction: 0.5,
            shape_max_area_fraction: 1.0,
            colors: vec![StrongColor::Red, StrongColor::Yellow, StrongColor::Blue],
            angle_tolerance: 15.0,
            color_merge_deviation: 10,
            shape_merge_deviation: 10,
            fusion_deviation: 15,
            fused_merge_deviation: 20,
            median_radius: 2,
            blur_radius: 2,
            edge_threshold: 30,
        }
    }
}

impl DetectionConfig {
    /// Area limits of color-channel boxes for an image of the given size
    pub fn color_limits(&self, width: u32, height: u32) -> AreaLimits {
        self.limits(width, height, self.color_max_area_fraction)
    }

    /// Area limits of shape-channel boxes for an image of the given size
    pub fn shape_limits(&self, width: u32, height: u32) -> AreaLimits {
        self.limits(width, height, self.shape_max_area_fraction)
    }

    fn limits(&self, width: u32, height: u32, max_fraction: f64) -> AreaLimits {
        let side = height as f64 * self.min_area_factor;
        let full = width as i64 * height as i64;
        AreaLimits::new((side * side) as i64, (full as f64 * max_fraction) as i64)
    }

    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DetectionConfig)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.toml` or `.json` file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            other => Err(DetectionError::invalid(format!(
                "unsupported configuration format {other:?}, use .toml or .json"
            ))),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
