//! Tract backend for segmentation models
//!
//! Tract is a pure Rust ONNX runtime, so the segmentation strategy works
//! without native libraries. The model is read from a local file; when the
//! file is missing the capability check falls back to a pass-through remover.

use crate::error::{PrepError, Result};
use crate::inference::InferenceBackend;
use crate::models::ModelInfo;
use ndarray::Array4;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Type alias for the complex Tract model type to reduce complexity warnings
type TractModel = RunnableModel<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

// Use instant crate for cross-platform time compatibility
use instant::{Duration, Instant};

/// Tract backend for running segmentation models using pure Rust inference
pub struct TractBackend {
    model_path: PathBuf,
    model_info: ModelInfo,
    model: Option<TractModel>,
}

impl TractBackend {
    /// Create a new uninitialized backend for the model at `model_path`
    #[must_use]
    pub fn new<P: AsRef<Path>>(model_path: P, model_info: ModelInfo) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
            model_info,
            model: None,
        }
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Load and optimize the model using Tract
    fn load_model(&mut self) -> Result<Duration> {
        let model_load_start = Instant::now();

        let model_data = std::fs::read(&self.model_path).map_err(|e| {
            PrepError::model(format!(
                "Failed to read model '{}': {e}",
                self.model_path.display()
            ))
        })?;

        info!(
            model = %self.model_info.name,
            path = %self.model_path.display(),
            size_mb = %format!("{:.2}", model_data.len() as f64 / (1024.0 * 1024.0)),
            "Initializing Tract backend"
        );

        let (n, c, h, w) = self.model_info.input_shape;
        let model = onnx()
            .model_for_read(&mut std::io::Cursor::new(model_data))
            .map_err(|e| PrepError::model(format!("Failed to load ONNX model: {e}")))?
            .with_input_fact(0, f32::fact([n, c, h, w]).into())
            .map_err(|e| PrepError::model(format!("Failed to set model input shape: {e}")))?
            .into_optimized()
            .map_err(|e| PrepError::model(format!("Failed to optimize model: {e}")))?
            .into_runnable()
            .map_err(|e| PrepError::model(format!("Failed to create runnable model: {e}")))?;

        self.model = Some(model);

        let model_load_time = model_load_start.elapsed();
        debug!(
            load_ms = model_load_time.as_millis() as u64,
            "Tract backend ready"
        );
        Ok(model_load_time)
    }
}

impl InferenceBackend for TractBackend {
    fn initialize(&mut self) -> Result<Option<Duration>> {
        if self.model.is_some() {
            return Ok(None);
        }
        self.load_model().map(Some)
    }

    fn infer(&mut self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| PrepError::inference("Tract model not initialized"))?;

        let input_data = input
            .as_slice()
            .ok_or_else(|| PrepError::inference("Input tensor is not contiguous"))?;
        let input_tensor = Tensor::from_shape::<f32>(input.shape(), input_data)
            .map_err(|e| PrepError::inference(format!("Failed to build input tensor: {e}")))?;

        let outputs = model
            .run(tvec![input_tensor.into()])
            .map_err(|e| PrepError::inference(format!("Tract inference failed: {e}")))?;

        // U²-Net emits several side outputs; the first is the fused mask
        let output = outputs
            .first()
            .ok_or_else(|| PrepError::inference("No output tensor found"))?;

        let output_shape = output.shape().to_vec();
        let dims: [usize; 4] = match output_shape.as_slice() {
            [n, c, h, w] => [*n, *c, *h, *w],
            [n, h, w] => [*n, 1, *h, *w],
            other => {
                return Err(PrepError::inference(format!(
                    "Expected 3D or 4D output tensor, got {}D",
                    other.len()
                )))
            },
        };

        let output_data = output
            .as_slice::<f32>()
            .map_err(|e| PrepError::inference(format!("Failed to read output tensor: {e}")))?;

        Array4::from_shape_vec(dims, output_data.to_vec()).map_err(|e| {
            PrepError::inference(format!("Failed to reshape output tensor: {e}"))
        })
    }

    fn model_info(&self) -> &ModelInfo {
        &self.model_info
    }

    fn is_initialized(&self) -> bool {
        self.model.is_some()
    }
}
