//! Image I/O operations service
//!
//! This module separates file I/O operations from business logic,
//! making the pipeline stages testable on in-memory buffers.

use crate::{
    error::{PrepError, Result},
    types::ImageInfo,
};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suffix appended to the input stem for the default output name
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_processed";

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// The format is sniffed from the file contents, falling back to the
    /// extension when the contents are ambiguous.
    ///
    /// # Errors
    /// - `PrepError::NotFound` if the path does not exist
    /// - `PrepError::Io` if the path cannot be inspected
    /// - `PrepError::Io` if the file cannot be read
    /// - `PrepError::Decode` if the contents are not a readable image
    ///
    /// # Examples
    /// ```rust,no_run
    /// use sprite_prep::services::ImageIOService;
    ///
    /// # async fn example() -> sprite_prep::Result<()> {
    /// let (image, info) = ImageIOService::load_image("bird.png").await?;
    /// println!("{}x{} {}", info.width, info.height, info.color_type);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_image<P: AsRef<Path>>(path: P) -> Result<(DynamicImage, ImageInfo)> {
        let path_ref = path.as_ref();

        let exists = tokio::fs::try_exists(path_ref)
            .await
            .map_err(|e| PrepError::file_io_error("inspect input", path_ref, e))?;
        if !exists {
            return Err(PrepError::NotFound(path_ref.to_path_buf()));
        }

        let data = tokio::fs::read(path_ref)
            .await
            .map_err(|e| PrepError::file_io_error("read image file", path_ref, e))?;

        let image = Self::decode(&data, path_ref)?;
        let info = ImageInfo::of(&image);

        info!(path = %path_ref.display(), "Loaded input image");
        info!(
            width = info.width,
            height = info.height,
            color_type = %info.color_type,
            "Original image"
        );

        Ok((image, info))
    }

    /// Decode image bytes, using `path` for the extension hint and error context
    pub fn decode(data: &[u8], path: &Path) -> Result<DynamicImage> {
        let mut reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| PrepError::file_io_error("inspect image data", path, e))?;

        if reader.format().is_none() {
            if let Ok(format) = ImageFormat::from_path(path) {
                debug!(?format, "Content sniffing failed, using extension");
                reader.set_format(format);
            }
        }

        reader.decode().map_err(|e| PrepError::decode(path, e))
    }

    /// Encode an RGBA image as PNG bytes
    ///
    /// # Errors
    /// Returns `PrepError::Encode` if the PNG encoder fails.
    pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(PrepError::Encode)?;
        Ok(buffer.into_inner())
    }

    /// Write an RGBA image as PNG, regardless of the path's extension
    ///
    /// Missing parent directories are created; an existing file is overwritten.
    ///
    /// # Errors
    /// - `PrepError::Encode` if PNG encoding fails
    /// - `PrepError::Io` if the directory or file cannot be written
    pub async fn save_png<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PrepError::file_io_error("create output directory", parent, e))?;
        }

        let bytes = Self::encode_png(image)?;
        tokio::fs::write(path_ref, &bytes)
            .await
            .map_err(|e| PrepError::file_io_error("write output image", path_ref, e))?;

        debug!(path = %path_ref.display(), bytes = bytes.len(), "Wrote PNG");
        Ok(())
    }

    /// Default output path: same directory and stem, `_processed` suffix, `.png`
    ///
    /// # Examples
    /// ```rust
    /// use sprite_prep::services::ImageIOService;
    /// use std::path::Path;
    ///
    /// assert_eq!(
    ///     ImageIOService::default_output_path(Path::new("assets/bird.jpg")),
    ///     Path::new("assets/bird_processed.png")
    /// );
    /// ```
    #[must_use]
    pub fn default_output_path(input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map_or_else(|| "output".into(), |s| s.to_string_lossy());
        input.with_file_name(format!("{stem}{DEFAULT_OUTPUT_SUFFIX}.png"))
    }
}
