//! Configuration types for sprite preparation

use crate::error::{PrepError, Result};
use crate::models::ModelSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default color threshold for the simple background remover
pub const DEFAULT_THRESHOLD: u8 = 240;

/// Target size for the resize stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeSpec {
    /// Resample to exactly these dimensions
    Exact { width: u32, height: u32 },
    /// Scale so the longer side equals this value, preserving aspect ratio
    MaxDimension(u32),
}

impl SizeSpec {
    /// Square target `size × size`
    #[must_use]
    pub fn square(size: u32) -> Self {
        Self::Exact {
            width: size,
            height: size,
        }
    }

    /// Check that every requested dimension is at least 1
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Exact { width, height } if width == 0 || height == 0 => Err(
                PrepError::invalid_size(self.to_string(), "dimensions must be at least 1"),
            ),
            Self::MaxDimension(0) => Err(PrepError::invalid_size(
                self.to_string(),
                "maximum dimension must be at least 1",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact { width, height } => write!(f, "{width}x{height}"),
            Self::MaxDimension(max) => write!(f, "max {max}"),
        }
    }
}

/// Parse `N` as an `N×N` square or `WxH` (case-insensitive `x`) as explicit dimensions
impl FromStr for SizeSpec {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        let parts: Vec<&str> = lowered.split('x').collect();

        let parse_part = |part: &str, label: &str| -> Result<u32> {
            let value: u32 = part.trim().parse().map_err(|_| {
                PrepError::invalid_size(s, format!("{label} '{}' is not a positive integer", part.trim()))
            })?;
            if value == 0 {
                return Err(PrepError::invalid_size(s, format!("{label} must be at least 1")));
            }
            Ok(value)
        };

        match parts.as_slice() {
            [size] => parse_part(size, "size").map(Self::square),
            [width, height] => Ok(Self::Exact {
                width: parse_part(width, "width")?,
                height: parse_part(height, "height")?,
            }),
            _ => Err(PrepError::invalid_size(
                s,
                "expected 'N' or 'WIDTHxHEIGHT'",
            )),
        }
    }
}

/// Background removal strategy selected at the entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalStrategy {
    /// ML foreground/background segmentation
    Segmentation { model: ModelSource },
    /// Pixels with R, G and B all strictly above the threshold become transparent
    ColorThreshold { threshold: u8 },
}

impl Default for RemovalStrategy {
    fn default() -> Self {
        Self::Segmentation {
            model: ModelSource::Default,
        }
    }
}

impl fmt::Display for RemovalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segmentation { model } => write!(f, "segmentation ({})", model.display_name()),
            Self::ColorThreshold { threshold } => write!(f, "color threshold (>{threshold})"),
        }
    }
}

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Background removal strategy, `None` to keep the background
    pub removal: Option<RemovalStrategy>,
    /// Resize target, `None` to keep the original dimensions
    pub size: Option<SizeSpec>,
}

impl ProcessingConfig {
    /// Create a new processing configuration builder
    #[must_use]
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::new()
    }
}

/// Builder for `ProcessingConfig`
#[derive(Debug, Default)]
pub struct ProcessingConfigBuilder {
    config: ProcessingConfig,
}

impl ProcessingConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn removal(mut self, strategy: Option<RemovalStrategy>) -> Self {
        self.config.removal = strategy;
        self
    }

    #[must_use]
    pub fn size(mut self, size: Option<SizeSpec>) -> Self {
        self.config.size = size;
        self
    }

    /// Build the processing configuration
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidSize` for zero-sized targets.
    pub fn build(self) -> Result<ProcessingConfig> {
        if let Some(size) = &self.config.size {
            size.validate()?;
        }
        Ok(self.config)
    }
}
