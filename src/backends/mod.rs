//! Background removal strategies
//!
//! This module provides the remover implementations selected at the entry point:
//! - Color threshold remover (pure pixel test, no dependencies)
//! - Segmentation remover (ML mask from an inference backend)
//! - Pass-through remover (stand-in when segmentation is unavailable)
//! - Tract backend (pure Rust ONNX inference for the segmentation remover)

use crate::error::Result;
use image::DynamicImage;

pub mod passthrough;
pub mod segmentation;
pub mod threshold;

#[cfg(feature = "tract")]
pub mod tract;

// Test utilities for backend testing
#[cfg(test)]
pub mod test_utils;

pub use self::passthrough::PassthroughRemover;
pub use self::segmentation::SegmentationRemover;
pub use self::threshold::ColorThresholdRemover;

#[cfg(feature = "tract")]
pub use self::tract::TractBackend;

/// A background removal strategy
///
/// Implementations receive the decoded image and return a new buffer in which
/// background pixels are transparent.
pub trait BackgroundRemover {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Remove the background from `image`
    ///
    /// # Errors
    /// Implementations return an error only for failures that should abort the
    /// pipeline; recoverable conditions degrade to returning the input.
    fn remove_background(&mut self, image: DynamicImage) -> Result<DynamicImage>;
}
