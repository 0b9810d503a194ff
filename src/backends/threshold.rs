//! Color threshold background removal
//!
//! Treats every pixel whose red, green and blue channels all strictly exceed
//! the threshold as background. Suited to sprites drawn on plain white.

use super::BackgroundRemover;
use crate::error::Result;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, info};

/// Replacement for background pixels: white, fully transparent
pub const TRANSPARENT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Removes near-white backgrounds with a per-pixel comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorThresholdRemover {
    threshold: u8,
}

impl ColorThresholdRemover {
    #[must_use]
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Whether a pixel counts as background at this threshold
    #[must_use]
    pub fn is_background(&self, pixel: &Rgba<u8>) -> bool {
        let [r, g, b, _] = pixel.0;
        r > self.threshold && g > self.threshold && b > self.threshold
    }

    /// Clear background pixels in place, returning how many were cleared
    pub fn apply(&self, image: &mut RgbaImage) -> usize {
        let mut cleared = 0;
        for pixel in image.pixels_mut() {
            if self.is_background(pixel) {
                *pixel = TRANSPARENT_WHITE;
                cleared += 1;
            }
        }
        cleared
    }
}

impl BackgroundRemover for ColorThresholdRemover {
    fn name(&self) -> &'static str {
        "color-threshold"
    }

    fn remove_background(&mut self, image: DynamicImage) -> Result<DynamicImage> {
        info!(threshold = self.threshold, "Removing near-white background");

        let mut rgba = image.into_rgba8();
        let cleared = self.apply(&mut rgba);

        debug!(
            cleared_pixels = cleared,
            total_pixels = rgba.len() / 4,
            "Color threshold pass complete"
        );
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}
