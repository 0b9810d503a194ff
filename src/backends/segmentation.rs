//! ML segmentation background removal
//!
//! Runs a salient-object segmentation model through an `InferenceBackend`
//! and uses the predicted mask as the alpha channel.

use super::BackgroundRemover;
use crate::{
    error::{PrepError, Result},
    inference::InferenceBackend,
    utils::ImagePreprocessor,
};
use image::{DynamicImage, GenericImageView};
use instant::Instant;
use tracing::{debug, info, span, warn, Level};

/// Background remover driven by a segmentation model
pub struct SegmentationRemover {
    backend: Box<dyn InferenceBackend>,
}

impl SegmentationRemover {
    /// Wrap an inference backend, initializing it if needed
    ///
    /// # Errors
    /// Propagates backend initialization failures.
    pub fn new(mut backend: Box<dyn InferenceBackend>) -> Result<Self> {
        if !backend.is_initialized() {
            if let Some(load_time) = backend.initialize()? {
                debug!(
                    model = %backend.model_info().name,
                    load_ms = load_time.as_millis() as u64,
                    "Segmentation model loaded"
                );
            }
        }
        Ok(Self { backend })
    }

    /// Predict a mask and apply it, failing on any inference problem
    fn segment(&mut self, image: &DynamicImage) -> Result<DynamicImage> {
        let dimensions = image.dimensions();
        let preprocessing = self.backend.model_info().preprocessing.clone();

        let input = {
            let _span = span!(
                Level::DEBUG,
                "preprocessing",
                width = dimensions.0,
                height = dimensions.1,
                target = preprocessing.target_size
            )
            .entered();
            ImagePreprocessor::preprocess_for_inference(image, &preprocessing)?
        };

        let inference_start = Instant::now();
        let prediction = self.backend.infer(&input)?;
        debug!(
            inference_ms = inference_start.elapsed().as_millis() as u64,
            output_shape = ?prediction.shape(),
            "Segmentation inference complete"
        );

        let mask = ImagePreprocessor::tensor_to_mask(&prediction, dimensions)?;
        let rgba = ImagePreprocessor::apply_mask(image.to_rgba8(), &mask)?;
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}

impl BackgroundRemover for SegmentationRemover {
    fn name(&self) -> &'static str {
        "segmentation"
    }

    fn remove_background(&mut self, image: DynamicImage) -> Result<DynamicImage> {
        info!(model = %self.backend.model_info().name, "Removing background with segmentation model");

        match self.segment(&image) {
            Ok(result) => Ok(result),
            Err(e @ (PrepError::Inference(_) | PrepError::Model(_))) => {
                warn!(error = %e, "Segmentation failed, keeping original background");
                Ok(image)
            },
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_utils::MockSegmentationBackend;
    use image::{Rgb, RgbImage};

    fn white_canvas() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([255, 255, 255])))
    }

    #[test]
    fn test_mask_becomes_alpha() {
        let backend = MockSegmentationBackend::left_half_foreground(16);
        let mut remover = SegmentationRemover::new(Box::new(backend)).unwrap();

        let result = remover.remove_background(white_canvas()).unwrap().into_rgba8();
        assert_eq!(result.dimensions(), (40, 20));
        assert_eq!(result.get_pixel(2, 10)[3], 255);
        assert_eq!(result.get_pixel(37, 10)[3], 0);
        // color channels are kept, only alpha changes
        assert_eq!(&result.get_pixel(37, 10).0[..3], &[255, 255, 255]);
    }

    #[test]
    fn test_backend_initialized_on_construction() {
        let backend = MockSegmentationBackend::left_half_foreground(8);
        let history = backend.call_history();
        let _remover = SegmentationRemover::new(Box::new(backend)).unwrap();
        assert_eq!(history.lock().unwrap().as_slice(), &["initialize".to_string()]);
    }

    #[test]
    fn test_failed_initialization_is_an_error() {
        let backend = MockSegmentationBackend::failing_init();
        assert!(matches!(
            SegmentationRemover::new(Box::new(backend)),
            Err(PrepError::Model(_))
        ));
    }

    #[test]
    fn test_inference_failure_keeps_original() {
        let backend = MockSegmentationBackend::failing_inference();
        let mut remover = SegmentationRemover::new(Box::new(backend)).unwrap();

        let input = white_canvas();
        let result = remover.remove_background(input.clone()).unwrap();
        assert_eq!(result, input);
    }
}
