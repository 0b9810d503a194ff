//! Segmentation model sources and preprocessing metadata

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory under the home directory where U²-Net models conventionally live
pub const DEFAULT_MODEL_DIR: &str = ".u2net";

/// File name of the default U²-Net model
pub const DEFAULT_MODEL_FILE: &str = "u2net.onnx";

/// Where the segmentation model comes from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelSource {
    /// `$HOME/.u2net/u2net.onnx`
    #[default]
    Default,
    /// An explicit model file
    External(PathBuf),
}

impl ModelSource {
    /// Get a display name for this model source
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Default => format!("~/{DEFAULT_MODEL_DIR}/{DEFAULT_MODEL_FILE}"),
            Self::External(path) => path.display().to_string(),
        }
    }

    /// Resolve the model source to a concrete file path
    ///
    /// The file is not required to exist; callers decide what a missing
    /// model means.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        match self {
            Self::Default => dirs::home_dir()
                .map(|home| home.join(DEFAULT_MODEL_DIR).join(DEFAULT_MODEL_FILE))
                .ok_or_else(|| PrepError::model("Could not determine home directory")),
            Self::External(path) => Ok(path.clone()),
        }
    }
}

/// Preprocessing parameters expected by a segmentation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Square input edge in pixels
    pub target_size: u32,
    /// Per-channel mean subtracted after scaling to `[0, 1]`
    pub normalization_mean: [f32; 3],
    /// Per-channel standard deviation
    pub normalization_std: [f32; 3],
}

/// Static description of a segmentation model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    /// NCHW input shape
    pub input_shape: (usize, usize, usize, usize),
    pub preprocessing: PreprocessingConfig,
}

impl ModelInfo {
    /// U²-Net general-purpose salient object segmentation
    #[must_use]
    pub fn u2net() -> Self {
        Self {
            name: "u2net".to_string(),
            input_shape: (1, 3, 320, 320),
            preprocessing: PreprocessingConfig {
                target_size: 320,
                normalization_mean: [0.485, 0.456, 0.406],
                normalization_std: [0.229, 0.224, 0.225],
            },
        }
    }
}
