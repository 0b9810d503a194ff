//! Inference backend abstraction for segmentation models

use crate::error::Result;
use crate::models::ModelInfo;
use ndarray::Array4;

// Use instant crate for cross-platform time compatibility
use instant::Duration;

/// Trait for segmentation inference backends
pub trait InferenceBackend {
    /// Load the model and prepare it for inference
    ///
    /// Returns the model load time, or `None` when already initialized.
    ///
    /// # Errors
    /// - Model file missing or unreadable
    /// - Model graph cannot be parsed or optimized
    fn initialize(&mut self) -> Result<Option<Duration>>;

    /// Run inference on an NCHW input tensor and return the raw prediction
    ///
    /// # Errors
    /// - Backend not initialized
    /// - Model inference failures
    /// - Unexpected output tensor rank
    fn infer(&mut self, input: &Array4<f32>) -> Result<Array4<f32>>;

    /// Static information about the loaded model
    fn model_info(&self) -> &ModelInfo;

    /// Check if backend is initialized
    fn is_initialized(&self) -> bool;
}
