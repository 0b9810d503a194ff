//! Sprite processing pipeline
//!
//! This module provides the `ImageProcessor` that runs one image through
//! loader → background remover → resizer → normalizer → writer, and the
//! `RemoverFactory` seam that turns a `RemovalStrategy` into a remover.

use crate::{
    backends::{BackgroundRemover, ColorThresholdRemover, PassthroughRemover},
    config::{ProcessingConfig, RemovalStrategy},
    error::{PrepError, Result},
    models::ModelSource,
    services::{ImageIOService, OutputFormatHandler, ResizeService},
    types::{ImageInfo, ProcessingReport, ProcessingTimings},
};
use image::{DynamicImage, RgbaImage};
use instant::Instant;
use std::path::Path;
use tracing::{debug, debug_span, info, instrument, span, warn, Instrument, Level};

/// Factory trait for creating background removers
pub trait RemoverFactory {
    /// Create the remover for `strategy`
    ///
    /// # Errors
    ///
    /// Returns `PrepError` only for failures that should abort the run;
    /// a missing segmentation capability yields a pass-through remover.
    fn create_remover(&self, strategy: &RemovalStrategy) -> Result<Box<dyn BackgroundRemover>>;
}

/// Default factory: color threshold is always available, segmentation is
/// probed once and replaced by a pass-through when it cannot run
pub struct DefaultRemoverFactory;

impl DefaultRemoverFactory {
    /// Build a working segmentation remover or explain why not
    ///
    /// # Errors
    ///
    /// Always `PrepError::SegmentationUnavailable` on failure, carrying the reason.
    pub fn probe_segmentation(model: &ModelSource) -> Result<Box<dyn BackgroundRemover>> {
        #[cfg(feature = "tract")]
        {
            use crate::backends::{SegmentationRemover, TractBackend};
            use crate::models::ModelInfo;

            let model_path = model
                .resolve_path()
                .map_err(|e| PrepError::segmentation_unavailable(e.to_string()))?;
            if !model_path.is_file() {
                return Err(PrepError::segmentation_unavailable(format!(
                    "model not found at {}",
                    model_path.display()
                )));
            }

            let backend = TractBackend::new(&model_path, ModelInfo::u2net());
            let remover = SegmentationRemover::new(Box::new(backend))
                .map_err(|e| PrepError::segmentation_unavailable(e.to_string()))?;
            Ok(Box::new(remover))
        }

        #[cfg(not(feature = "tract"))]
        {
            Err(PrepError::segmentation_unavailable(format!(
                "built without the `tract` feature (model {})",
                model.display_name()
            )))
        }
    }
}

impl RemoverFactory for DefaultRemoverFactory {
    fn create_remover(&self, strategy: &RemovalStrategy) -> Result<Box<dyn BackgroundRemover>> {
        match strategy {
            RemovalStrategy::ColorThreshold { threshold } => {
                Ok(Box::new(ColorThresholdRemover::new(*threshold)))
            },
            RemovalStrategy::Segmentation { model } => match Self::probe_segmentation(model) {
                Ok(remover) => Ok(remover),
                Err(e) if e.is_recoverable() => {
                    warn!(
                        reason = %e,
                        "Skipping background removal; pass --simple for color-threshold removal"
                    );
                    Ok(Box::new(PassthroughRemover::new(e.to_string())))
                },
                Err(e) => Err(e),
            },
        }
    }
}

/// Runs images through the configured pipeline
pub struct ImageProcessor {
    config: ProcessingConfig,
    factory: Box<dyn RemoverFactory>,
    remover: Option<Box<dyn BackgroundRemover>>,
    initialized: bool,
}

impl ImageProcessor {
    /// Create a new processor with the default remover factory
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidSize` for a zero-sized resize target.
    pub fn new(config: ProcessingConfig) -> Result<Self> {
        Self::with_factory(config, Box::new(DefaultRemoverFactory))
    }

    /// Create a new processor with a custom remover factory
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidSize` for a zero-sized resize target.
    pub fn with_factory(config: ProcessingConfig, factory: Box<dyn RemoverFactory>) -> Result<Self> {
        if let Some(size) = &config.size {
            size.validate()?;
        }
        Ok(Self {
            config,
            factory,
            remover: None,
            initialized: false,
        })
    }

    /// Name of the active remover, once initialized
    #[must_use]
    pub fn remover_name(&self) -> Option<&'static str> {
        self.remover.as_ref().map(|r| r.name())
    }

    /// Select the background remover; runs the capability check at most once
    ///
    /// # Errors
    ///
    /// Propagates fatal factory errors.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        if let Some(strategy) = &self.config.removal {
            debug!(%strategy, "Selecting background remover");
            let remover = self.factory.create_remover(strategy)?;
            debug!(remover = remover.name(), "Background remover ready");
            self.remover = Some(remover);
        }
        self.initialized = true;
        Ok(())
    }

    /// Run remove → resize → normalize on an in-memory image
    ///
    /// # Errors
    ///
    /// Returns `PrepError` for fatal remover failures and invalid sizes.
    pub fn process_image(&mut self, image: DynamicImage) -> Result<RgbaImage> {
        let mut timings = ProcessingTimings::default();
        self.run_stages(image, &mut timings)
    }

    fn run_stages(
        &mut self,
        image: DynamicImage,
        timings: &mut ProcessingTimings,
    ) -> Result<RgbaImage> {
        self.initialize()?;

        let image = match self.remover.as_mut() {
            Some(remover) => {
                let _span = span!(Level::DEBUG, "remove_background", remover = remover.name())
                    .entered();
                let start = Instant::now();
                let result = remover.remove_background(image)?;
                timings.removal_ms = start.elapsed().as_millis() as u64;
                result
            },
            None => {
                debug!("Background removal disabled");
                image
            },
        };

        let image = match self.config.size {
            Some(spec) => {
                let _span = span!(Level::DEBUG, "resize", target = %spec).entered();
                let start = Instant::now();
                let resized = ResizeService::resize(&image, spec)?;
                timings.resize_ms = start.elapsed().as_millis() as u64;
                resized
            },
            None => image,
        };

        Ok(OutputFormatHandler::ensure_rgba(image))
    }

    /// Process an image file and write the PNG result
    ///
    /// When `output` is `None` the result is written next to the input as
    /// `<stem>_processed.png`.
    ///
    /// # Errors
    ///
    /// Returns `PrepError` for:
    /// - Missing or undecodable input
    /// - Invalid resize targets
    /// - Encoding or write failures
    #[instrument(skip(self, input, output), fields(input = %input.as_ref().display()))]
    pub async fn process_file<P: AsRef<Path>>(
        &mut self,
        input: P,
        output: Option<&Path>,
    ) -> Result<ProcessingReport> {
        let input = input.as_ref();
        let output_path = output.map_or_else(
            || ImageIOService::default_output_path(input),
            Path::to_path_buf,
        );

        info!(output = %output_path.display(), "Processing image");

        let total_start = Instant::now();
        let mut timings = ProcessingTimings::default();

        let load_start = Instant::now();
        let (image, original) = ImageIOService::load_image(input)
            .instrument(debug_span!("load"))
            .await?;
        timings.load_ms = load_start.elapsed().as_millis() as u64;

        let rgba = self.run_stages(image, &mut timings)?;

        let save_start = Instant::now();
        ImageIOService::save_png(&rgba, &output_path)
            .instrument(debug_span!("save"))
            .await?;
        timings.save_ms = save_start.elapsed().as_millis() as u64;
        timings.total_ms = total_start.elapsed().as_millis() as u64;

        let output = ImageInfo::of(&DynamicImage::ImageRgba8(rgba));
        info!(
            path = %output_path.display(),
            width = output.width,
            height = output.height,
            total_ms = timings.total_ms,
            "Saved processed image"
        );

        Ok(ProcessingReport {
            input_path: input.to_path_buf(),
            output_path,
            original,
            output,
            remover: self.remover_name().map(str::to_string),
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_utils::MockSegmentationBackend;
    use crate::backends::SegmentationRemover;
    use crate::config::SizeSpec;
    use image::{GenericImageView, Rgb, RgbImage};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Factory that serves mock segmentation and counts how often it is asked
    struct CountingFactory {
        calls: Rc<Cell<usize>>,
    }

    impl RemoverFactory for CountingFactory {
        fn create_remover(
            &self,
            strategy: &RemovalStrategy,
        ) -> Result<Box<dyn BackgroundRemover>> {
            self.calls.set(self.calls.get() + 1);
            match strategy {
                RemovalStrategy::Segmentation { .. } => Ok(Box::new(SegmentationRemover::new(
                    Box::new(MockSegmentationBackend::left_half_foreground(16)),
                )?)),
                RemovalStrategy::ColorThreshold { threshold } => {
                    Ok(Box::new(ColorThresholdRemover::new(*threshold)))
                },
            }
        }
    }

    fn sprite_on_white() -> DynamicImage {
        let mut image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        for y in 30..70 {
            for x in 30..70 {
                image.put_pixel(x, y, Rgb([200, 40, 40]));
            }
        }
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn test_no_stages_still_rgba() {
        let mut processor = ImageProcessor::new(ProcessingConfig::default()).unwrap();
        let result = processor.process_image(DynamicImage::new_luma8(7, 3)).unwrap();
        assert_eq!(result.dimensions(), (7, 3));
        assert!(result.pixels().all(|p| p[3] == 255));
        assert_eq!(processor.remover_name(), None);
    }

    #[test]
    fn test_threshold_then_resize() {
        let config = ProcessingConfig::builder()
            .removal(Some(RemovalStrategy::ColorThreshold { threshold: 240 }))
            .size(Some(SizeSpec::square(64)))
            .build()
            .unwrap();
        let mut processor = ImageProcessor::new(config).unwrap();

        let result = processor.process_image(sprite_on_white()).unwrap();
        assert_eq!(result.dimensions(), (64, 64));
        assert_eq!(result.get_pixel(0, 0)[3], 0);
        assert_eq!(result.get_pixel(32, 32)[3], 255);
        assert_eq!(processor.remover_name(), Some("color-threshold"));
    }

    #[test]
    fn test_missing_model_degrades_to_passthrough() {
        let config = ProcessingConfig::builder()
            .removal(Some(RemovalStrategy::Segmentation {
                model: ModelSource::External("/nonexistent/u2net.onnx".into()),
            }))
            .build()
            .unwrap();
        let mut processor = ImageProcessor::new(config).unwrap();

        let result = processor.process_image(sprite_on_white()).unwrap();
        assert_eq!(processor.remover_name(), Some("passthrough"));
        assert_eq!(result.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(result.get_pixel(50, 50).0, [200, 40, 40, 255]);
    }

    #[test]
    fn test_factory_consulted_once() {
        let calls = Rc::new(Cell::new(0));
        let config = ProcessingConfig::builder()
            .removal(Some(RemovalStrategy::default()))
            .build()
            .unwrap();
        let mut processor = ImageProcessor::with_factory(
            config,
            Box::new(CountingFactory {
                calls: Rc::clone(&calls),
            }),
        )
        .unwrap();

        for _ in 0..3 {
            let result = processor.process_image(sprite_on_white()).unwrap();
            assert_eq!(result.get_pixel(5, 50)[3], 255);
            assert_eq!(result.get_pixel(95, 50)[3], 0);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(processor.remover_name(), Some("segmentation"));
    }

    #[test]
    fn test_zero_size_rejected_at_construction() {
        let config = ProcessingConfig {
            removal: None,
            size: Some(SizeSpec::Exact {
                width: 0,
                height: 5,
            }),
        };
        assert!(matches!(
            ImageProcessor::new(config),
            Err(PrepError::InvalidSize { .. })
        ));
    }

    #[tokio::test]
    async fn test_process_file_writes_default_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bird.png");
        sprite_on_white().save(&input).unwrap();

        let config = ProcessingConfig::builder()
            .removal(Some(RemovalStrategy::ColorThreshold { threshold: 240 }))
            .size(Some(SizeSpec::MaxDimension(50)))
            .build()
            .unwrap();
        let mut processor = ImageProcessor::new(config).unwrap();
        let report = processor.process_file(&input, None).await.unwrap();

        assert_eq!(report.output_path, dir.path().join("bird_processed.png"));
        assert_eq!(report.original.color_type, "Rgb8");
        assert_eq!((report.output.width, report.output.height), (50, 50));
        assert_eq!(report.output.color_type, "Rgba8");
        assert_eq!(report.remover.as_deref(), Some("color-threshold"));

        let written = image::open(&report.output_path).unwrap();
        assert_eq!(written.dimensions(), (50, 50));
        assert!(matches!(written, DynamicImage::ImageRgba8(_)));
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_remover_selection() {
        let dir = TempDir::new().unwrap();
        let calls = Rc::new(Cell::new(0));
        let config = ProcessingConfig::builder()
            .removal(Some(RemovalStrategy::default()))
            .build()
            .unwrap();
        let mut processor = ImageProcessor::with_factory(
            config,
            Box::new(CountingFactory {
                calls: Rc::clone(&calls),
            }),
        )
        .unwrap();

        let err = processor
            .process_file(dir.path().join("missing.png"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PrepError::NotFound(_)));
        assert_eq!(calls.get(), 0);
    }
}
