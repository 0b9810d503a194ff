//! Tensor conversion around segmentation inference
//!
//! Converts images into normalized NCHW tensors for the model and turns the
//! raw prediction back into an alpha mask at the original resolution.

use crate::{
    error::{PrepError, Result},
    models::PreprocessingConfig,
};
use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, Luma, RgbaImage};
use ndarray::{s, Array4};

/// Shared image preprocessing utilities
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Preprocess image for model inference
    ///
    /// This function handles:
    /// - RGB conversion
    /// - Lanczos resize to the square model input
    /// - Scaling by the brightest channel value
    /// - Mean/std normalization into NCHW layout
    pub fn preprocess_for_inference(
        image: &DynamicImage,
        preprocessing_config: &PreprocessingConfig,
    ) -> Result<Array4<f32>> {
        let target_size = preprocessing_config.target_size;
        if target_size == 0 {
            return Err(PrepError::model("Model input size must be at least 1"));
        }

        let rgb_image = image.to_rgb8();
        let resized = imageops::resize(&rgb_image, target_size, target_size, FilterType::Lanczos3);

        let max_value = resized
            .as_raw()
            .iter()
            .copied()
            .max()
            .map_or(1.0, |max| f32::from(max).max(1e-6));

        let size = target_size as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
        let mean = preprocessing_config.normalization_mean;
        let std = preprocessing_config.normalization_std;

        #[allow(clippy::indexing_slicing)]
        // Safe: tensor allocated with the resized image's dimensions, c < 3
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                let scaled = f32::from(pixel[c]) / max_value;
                tensor[[0, c, y as usize, x as usize]] = (scaled - mean[c]) / std[c];
            }
        }

        Ok(tensor)
    }

    /// Convert the model's prediction into a mask of the given dimensions
    ///
    /// The first channel of the first batch entry is min-max normalized; a
    /// flat prediction is clamped to `[0, 1]` instead.
    pub fn tensor_to_mask(prediction: &Array4<f32>, dimensions: (u32, u32)) -> Result<GrayImage> {
        let shape = prediction.shape();
        if shape.first() == Some(&0) || shape.get(1) == Some(&0) {
            return Err(PrepError::inference(format!(
                "Prediction tensor has no mask channel: {shape:?}"
            )));
        }

        let plane = prediction.slice(s![0, 0, .., ..]);
        let (mask_height, mask_width): (usize, usize) = plane.dim();
        if mask_height == 0 || mask_width == 0 {
            return Err(PrepError::inference("Prediction mask is empty"));
        }

        let (min, max) = plane
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let range = max - min;

        let mut mask = GrayImage::new(mask_width as u32, mask_height as u32);
        for ((y, x), &value) in plane.indexed_iter() {
            let normalized = if range > f32::EPSILON {
                (value - min) / range
            } else {
                value.clamp(0.0, 1.0)
            };
            mask.put_pixel(
                x as u32,
                y as u32,
                Luma([(normalized * 255.0).round().clamp(0.0, 255.0) as u8]),
            );
        }

        let (width, height) = dimensions;
        if (width, height) == mask.dimensions() {
            return Ok(mask);
        }
        Ok(imageops::resize(&mask, width, height, FilterType::Lanczos3))
    }

    /// Multiply a mask into the alpha channel of an RGBA image
    pub fn apply_mask(mut image: RgbaImage, mask: &GrayImage) -> Result<RgbaImage> {
        if image.dimensions() != mask.dimensions() {
            return Err(PrepError::inference(format!(
                "Mask size {:?} does not match image size {:?}",
                mask.dimensions(),
                image.dimensions()
            )));
        }

        for (pixel, mask_pixel) in image.pixels_mut().zip(mask.pixels()) {
            let alpha = u16::from(pixel[3]) * u16::from(mask_pixel[0]) / 255;
            pixel[3] = alpha as u8;
        }
        Ok(image)
    }
}
