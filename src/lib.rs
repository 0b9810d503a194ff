#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # sprite-prep
//!
//! Prepares raster images for use as 2D game sprites: removes the background,
//! optionally resizes, and writes an 8-bit RGBA PNG.
//!
//! ## Pipeline
//!
//! ```text
//! load → remove background → resize → ensure RGBA → write PNG
//! ```
//!
//! Background removal uses one of two strategies:
//!
//! - **Segmentation**: U²-Net foreground prediction via the pure-Rust Tract
//!   backend. When the model or backend is unavailable the run continues
//!   without removal and logs a warning.
//! - **Color threshold**: pixels whose R, G and B all exceed a threshold
//!   become fully transparent. Suited to sprites drawn on white.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprite_prep::{ImageProcessor, ProcessingConfig, RemovalStrategy, SizeSpec};
//!
//! # async fn example() -> sprite_prep::Result<()> {
//! let config = ProcessingConfig::builder()
//!     .removal(Some(RemovalStrategy::ColorThreshold { threshold: 240 }))
//!     .size(Some(SizeSpec::square(64)))
//!     .build()?;
//!
//! let mut processor = ImageProcessor::new(config)?;
//! let report = processor.process_file("bird.png", None).await?;
//! println!("wrote {}", report.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ### Feature Flags
//!
//! - `tract` (default): segmentation backend (pure Rust ONNX inference)
//! - `cli` (default): command-line interface and tracing subscriber setup
//! - `webp-support` (default): WebP input decoding

pub mod backends;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod inference;
pub mod models;
pub mod processor;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;
pub mod utils;

// Public API exports
pub use backends::{BackgroundRemover, ColorThresholdRemover, PassthroughRemover, SegmentationRemover};
#[cfg(feature = "tract")]
pub use backends::TractBackend;
pub use config::{ProcessingConfig, ProcessingConfigBuilder, RemovalStrategy, SizeSpec, DEFAULT_THRESHOLD};
pub use error::{PrepError, Result};
pub use inference::InferenceBackend;
pub use models::{ModelInfo, ModelSource};
pub use processor::{DefaultRemoverFactory, ImageProcessor, RemoverFactory};
pub use services::{ImageIOService, OutputFormatHandler, ResizeService};
pub use types::{ImageInfo, ProcessingReport, ProcessingTimings};
pub use utils::ImagePreprocessor;

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Process a single image file with the given configuration
///
/// Convenience wrapper around [`ImageProcessor::process_file`] using the
/// default remover factory.
///
/// # Examples
///
/// ```rust,no_run
/// use sprite_prep::{process_image_file, ProcessingConfig, SizeSpec};
/// use std::path::Path;
///
/// # async fn example() -> sprite_prep::Result<()> {
/// let config = ProcessingConfig::builder()
///     .size(Some(SizeSpec::MaxDimension(128)))
///     .build()?;
/// process_image_file("tree.png", Some(Path::new("sprites/tree.png")), config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn process_image_file<P: AsRef<std::path::Path>>(
    input: P,
    output: Option<&std::path::Path>,
    config: ProcessingConfig,
) -> Result<ProcessingReport> {
    let mut processor = ImageProcessor::new(config)?;
    processor.process_file(input, output).await
}
