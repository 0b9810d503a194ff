//! Result and metadata types produced by the pipeline

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dimensions and color mode of an image buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Color mode as reported by the decoder, e.g. `Rgb8`
    pub color_type: String,
}

impl ImageInfo {
    /// Describe a decoded image
    #[must_use]
    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            color_type: format!("{:?}", image.color()),
        }
    }
}

/// Wall-clock time spent in each pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTimings {
    pub load_ms: u64,
    pub removal_ms: u64,
    pub resize_ms: u64,
    pub save_ms: u64,
    pub total_ms: u64,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub original: ImageInfo,
    pub output: ImageInfo,
    /// Name of the background remover that ran, if any
    pub remover: Option<String>,
    pub timings: ProcessingTimings,
}
