//! Output format normalization
//!
//! The writer only ever emits 8-bit RGBA PNG, so every buffer leaving the
//! pipeline passes through here first.

use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Service for bringing buffers into the output pixel format
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Ensure the image is 8-bit RGBA
    ///
    /// RGBA8 buffers are returned without copying. Modes without alpha gain an
    /// opaque alpha channel; modes with alpha keep it, scaled to 8 bits.
    ///
    /// # Examples
    /// ```rust
    /// use image::DynamicImage;
    /// use sprite_prep::services::OutputFormatHandler;
    ///
    /// let rgba = OutputFormatHandler::ensure_rgba(DynamicImage::new_rgb8(4, 4));
    /// assert!(rgba.pixels().all(|p| p[3] == 255));
    /// ```
    #[must_use]
    pub fn ensure_rgba(image: DynamicImage) -> RgbaImage {
        match image {
            DynamicImage::ImageRgba8(rgba) => rgba,
            other => {
                debug!(from = ?other.color(), "Converting to RGBA8");
                other.into_rgba8()
            },
        }
    }
}
