use std::fmt;

use image::{GrayImage, Luma, Rgb, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use crate::{
    traits::ColorPredicate,
    types::{BoxColor, Hsv},
};

/// Built-in "strong color" predicates tuned for traffic-sign paint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrongColor {
    Red,
    Green,
    Yellow,
    Blue,
}

impl StrongColor {
    /// Tag stamped on boxes found by this predicate
    pub fn box_color(&self) -> BoxColor {
        match self {
            Self::Red => BoxColor::RED,
            Self::Green => BoxColor::GREEN,
            Self::Yellow => BoxColor::YELLOW,
            Self::Blue => BoxColor::BLUE,
        }
    }

    pub fn channel(self) -> ColorChannel {
        ColorChannel::new(self.box_color(), self)
    }
}

impl ColorPredicate for StrongColor {
    fn matches(&self, Hsv { h, s, v }: Hsv) -> bool {
        match self {
            Self::Red => (h >= 340.0 || h <= 20.0) && s >= 0.3 && v >= 0.1,
            Self::Green => (105.0..=135.0).contains(&h) && s >= 0.3 && v >= 0.1,
            Self::Yellow => (35.0..=65.0).contains(&h) && s >= 0.5 && v >= 0.3,
            Self::Blue => (200.0..=240.0).contains(&h) && s >= 0.4 && v >= 0.2,
        }
    }
}

/// A color predicate paired with the tag its boxes carry.
pub struct ColorChannel {
    pub tag: BoxColor,
    pub predicate: Box<dyn ColorPredicate>,
}

impl ColorChannel {
    pub fn new<P>(tag: BoxColor, predicate: P) -> Self
    where
        P: ColorPredicate + 'static,
    {
        Self {
            tag,
            predicate: Box::new(predicate),
        }
    }
}

impl fmt::Debug for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorChannel").field("tag", &self.tag).finish_non_exhaustive()
    }
}

pub fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> Hsv {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    Hsv { h, s, v: max }
}

/// 0/255 mask of the pixels whose HSV value satisfies `predicate`.
pub fn color_mask(image: &RgbImage, predicate: &dyn ColorPredicate) -> GrayImage {
    imageproc::map::map_colors(image, |pixel| {
        Luma([if predicate.matches(rgb_to_hsv(pixel)) { 255 } else { 0 }])
    })
}
