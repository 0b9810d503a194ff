//! Mock inference backends for testing segmentation without model files

use crate::{
    error::{PrepError, Result},
    inference::InferenceBackend,
    models::{ModelInfo, PreprocessingConfig},
};
use instant::Duration;
use ndarray::Array4;
use std::sync::{Arc, Mutex};

/// Mock segmentation backend producing a fixed prediction
#[derive(Debug, Clone)]
pub struct MockSegmentationBackend {
    initialized: bool,
    model_info: ModelInfo,
    /// Prediction returned by every `infer` call
    prediction: Array4<f32>,
    /// Call history for verification in tests
    call_history: Arc<Mutex<Vec<String>>>,
    should_fail_init: bool,
    should_fail_inference: bool,
}

impl MockSegmentationBackend {
    /// Backend whose mask marks the left half of the frame as foreground
    #[must_use]
    pub fn left_half_foreground(size: usize) -> Self {
        let prediction = Array4::from_shape_fn((1, 1, size, size), |(_, _, _, x)| {
            if x < size / 2 {
                1.0
            } else {
                0.0
            }
        });

        Self {
            initialized: false,
            model_info: ModelInfo {
                name: "mock-segmentation".to_string(),
                input_shape: (1, 3, size, size),
                preprocessing: PreprocessingConfig {
                    target_size: size as u32,
                    normalization_mean: [0.485, 0.456, 0.406],
                    normalization_std: [0.229, 0.224, 0.225],
                },
            },
            prediction,
            call_history: Arc::new(Mutex::new(Vec::new())),
            should_fail_init: false,
            should_fail_inference: false,
        }
    }

    /// Create a mock backend that will fail during initialization
    #[must_use]
    pub fn failing_init() -> Self {
        let mut backend = Self::left_half_foreground(8);
        backend.should_fail_init = true;
        backend
    }

    /// Create a mock backend that will fail during inference
    #[must_use]
    pub fn failing_inference() -> Self {
        let mut backend = Self::left_half_foreground(8);
        backend.should_fail_inference = true;
        backend
    }

    /// Shared handle to the call history, usable after the backend is boxed
    #[must_use]
    pub fn call_history(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.call_history)
    }

    fn record(&self, call: &str) {
        self.call_history.lock().unwrap().push(call.to_string());
    }
}

impl InferenceBackend for MockSegmentationBackend {
    fn initialize(&mut self) -> Result<Option<Duration>> {
        self.record("initialize");
        if self.should_fail_init {
            return Err(PrepError::model("Mock initialization failure"));
        }
        if self.initialized {
            return Ok(None);
        }
        self.initialized = true;
        Ok(Some(Duration::from_millis(1)))
    }

    fn infer(&mut self, input: &Array4<f32>) -> Result<Array4<f32>> {
        self.record("infer");
        if !self.initialized {
            return Err(PrepError::inference("Mock backend not initialized"));
        }
        if self.should_fail_inference {
            return Err(PrepError::inference("Mock inference failure"));
        }

        let (n, c, h, w) = self.model_info.input_shape;
        if input.shape() != [n, c, h, w] {
            return Err(PrepError::inference(format!(
                "Unexpected input shape {:?}",
                input.shape()
            )));
        }
        Ok(self.prediction.clone())
    }

    fn model_info(&self) -> &ModelInfo {
        &self.model_info
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }
}
