//! Resize stage
//!
//! Lanczos3 resampling to an explicit size or to a bounding dimension.
//! Images with alpha are resampled with premultiplied color so that the
//! color of transparent pixels never bleeds into visible edges.

use crate::{
    config::SizeSpec,
    error::{PrepError, Result},
};
use image::{imageops, imageops::FilterType, DynamicImage, GenericImageView, Rgba32FImage};
use tracing::info;

/// Resampling filter used for every resize
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Service for scaling images
pub struct ResizeService;

impl ResizeService {
    /// Compute the output dimensions for `spec` applied to `current`
    ///
    /// For `MaxDimension`, the longer side becomes exactly the bound and the
    /// other side is `trunc(other * (bound / longer))`.
    ///
    /// # Errors
    /// `PrepError::InvalidSize` if the source or target has a zero dimension.
    pub fn target_dimensions(current: (u32, u32), spec: SizeSpec) -> Result<(u32, u32)> {
        spec.validate()?;

        let (width, height) = current;
        if width == 0 || height == 0 {
            return Err(PrepError::invalid_size(
                spec.to_string(),
                format!("cannot resize an image of {width}x{height}"),
            ));
        }

        let target = match spec {
            SizeSpec::Exact { width, height } => (width, height),
            SizeSpec::MaxDimension(max_size) => {
                let max = f64::from(max_size);
                if width >= height {
                    let scaled = f64::from(height) * (max / f64::from(width));
                    (max_size, scaled as u32)
                } else {
                    let scaled = f64::from(width) * (max / f64::from(height));
                    (scaled as u32, max_size)
                }
            },
        };

        if target.0 == 0 || target.1 == 0 {
            return Err(PrepError::invalid_size(
                spec.to_string(),
                format!(
                    "{width}x{height} scales to {}x{}, which has a zero dimension",
                    target.0, target.1
                ),
            ));
        }
        Ok(target)
    }

    /// Resize according to `spec`
    pub fn resize(image: &DynamicImage, spec: SizeSpec) -> Result<DynamicImage> {
        let (width, height) = Self::target_dimensions(image.dimensions(), spec)?;
        Ok(Self::resample(image, width, height))
    }

    /// Resample to exactly `width × height`
    pub fn resize_exact(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
        Self::resize(image, SizeSpec::Exact { width, height })
    }

    /// Scale so the longer side equals `max_size`, preserving aspect ratio
    pub fn resize_keep_aspect(image: &DynamicImage, max_size: u32) -> Result<DynamicImage> {
        Self::resize(image, SizeSpec::MaxDimension(max_size))
    }

    fn resample(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        info!(width, height, "Resizing");
        if !image.color().has_alpha() {
            return image.resize_exact(width, height, RESIZE_FILTER);
        }

        let mut premultiplied = image.to_rgba32f();
        for pixel in premultiplied.pixels_mut() {
            let [r, g, b, a] = &mut pixel.0;
            *r *= *a;
            *g *= *a;
            *b *= *a;
        }

        let mut resized: Rgba32FImage =
            imageops::resize(&premultiplied, width, height, RESIZE_FILTER);
        for pixel in resized.pixels_mut() {
            let [r, g, b, a] = &mut pixel.0;
            // Lanczos lobes can push alpha slightly outside [0, 1]
            *a = a.clamp(0.0, 1.0);
            for channel in [r, g, b] {
                *channel = if *a > 0.0 {
                    (*channel / *a).clamp(0.0, 1.0)
                } else {
                    0.0
                };
            }
        }
        DynamicImage::ImageRgba32F(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_aspect_landscape() {
        let image = DynamicImage::new_rgb8(200, 100);
        let resized = ResizeService::resize_keep_aspect(&image, 64).unwrap();
        assert_eq!(resized.dimensions(), (64, 32));
    }

    #[test]
    fn test_keep_aspect_portrait_truncates() {
        assert_eq!(
            ResizeService::target_dimensions((100, 300), SizeSpec::MaxDimension(64)).unwrap(),
            (21, 64)
        );
        assert_eq!(
            ResizeService::target_dimensions((333, 500), SizeSpec::MaxDimension(100)).unwrap(),
            (66, 100)
        );
    }

    #[test]
    fn test_keep_aspect_square_and_upscale() {
        assert_eq!(
            ResizeService::target_dimensions((50, 50), SizeSpec::MaxDimension(64)).unwrap(),
            (64, 64)
        );
        assert_eq!(
            ResizeService::target_dimensions((10, 5), SizeSpec::MaxDimension(100)).unwrap(),
            (100, 50)
        );
    }

    #[test]
    fn test_exact_ignores_aspect_ratio() {
        for (w, h) in [(200, 100), (17, 301), (48, 48), (1, 1)] {
            let image = DynamicImage::new_rgba8(w, h);
            let resized = ResizeService::resize_exact(&image, 48, 48).unwrap();
            assert_eq!(resized.dimensions(), (48, 48));
        }
    }

    #[test]
    fn test_zero_targets_rejected() {
        let image = DynamicImage::new_rgb8(10, 10);
        assert!(matches!(
            ResizeService::resize_exact(&image, 0, 10),
            Err(PrepError::InvalidSize { .. })
        ));
        assert!(matches!(
            ResizeService::resize_keep_aspect(&image, 0),
            Err(PrepError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_degenerate_derived_side_rejected() {
        assert!(matches!(
            ResizeService::target_dimensions((1000, 1), SizeSpec::MaxDimension(64)),
            Err(PrepError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_empty_source_rejected() {
        assert!(ResizeService::target_dimensions((0, 10), SizeSpec::square(8)).is_err());
    }

    #[test]
    fn test_resize_keeps_background_transparent() {
        let image = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            100,
            100,
            image::Rgba([255, 255, 255, 0]),
        ));
        let resized = ResizeService::resize_exact(&image, 64, 64).unwrap().into_rgba8();
        assert!(resized.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_transparent_color_does_not_bleed_into_edges() {
        // opaque red on the left, fully transparent green on the right
        let source = image::RgbaImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 255, 0, 0])
            }
        });
        let resized = ResizeService::resize_exact(&DynamicImage::ImageRgba8(source), 30, 30)
            .unwrap()
            .into_rgba8();

        assert_eq!(resized.get_pixel(0, 15).0, [255, 0, 0, 255]);
        assert_eq!(resized.get_pixel(29, 15)[3], 0);
        for pixel in resized.pixels().filter(|p| p[3] > 0) {
            assert_eq!(pixel[1], 0, "background color leaked: {:?}", pixel.0);
            assert_eq!(pixel[0], 255, "edge color darkened: {:?}", pixel.0);
        }
    }

    #[test]
    fn test_opaque_input_keeps_color_type() {
        let image = DynamicImage::new_rgb8(20, 10);
        let resized = ResizeService::resize_exact(&image, 5, 5).unwrap();
        assert!(matches!(resized, DynamicImage::ImageRgb8(_)));
    }
}
