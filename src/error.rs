//! Error types for sprite preparation operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for sprite preparation operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Error kinds raised by the processing pipeline
#[derive(Error, Debug)]
pub enum PrepError {
    /// Input path does not exist
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed or degenerate size request
    #[error("Invalid size '{input}': {reason}")]
    InvalidSize { input: String, reason: String },

    /// Input file is not a readable image
    #[error("Failed to decode image '{}'", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// PNG encoding failed
    #[error("Failed to encode PNG")]
    Encode(#[source] image::ImageError),

    /// Filesystem errors with the operation that failed
    #[error("Failed to {operation} '{}'", .path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The segmentation strategy cannot run in this environment
    #[error("Segmentation unavailable: {0}")]
    SegmentationUnavailable(String),

    /// Model loading or initialization errors
    #[error("Model error: {0}")]
    Model(String),

    /// Backend inference errors
    #[error("Inference error: {0}")]
    Inference(String),

}

impl PrepError {
    /// Create a new invalid size error
    pub fn invalid_size<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidSize {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new decode error for the given input path
    pub fn decode<P: AsRef<Path>>(path: P, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new segmentation unavailable error
    pub fn segmentation_unavailable<S: Into<String>>(reason: S) -> Self {
        Self::SegmentationUnavailable(reason.into())
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(msg: S) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(msg: S) -> Self {
        Self::Inference(msg.into())
    }

    /// Whether the pipeline may continue after this error
    ///
    /// Only a missing segmentation capability is recoverable; the remover
    /// degrades to a pass-through and processing goes on.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SegmentationUnavailable(_))
    }
}
