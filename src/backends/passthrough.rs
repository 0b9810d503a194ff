//! Pass-through remover used when segmentation cannot run

use super::BackgroundRemover;
use crate::error::Result;
use image::DynamicImage;
use tracing::debug;

/// Returns every image unchanged
#[derive(Debug, Clone, Default)]
pub struct PassthroughRemover {
    reason: Option<String>,
}

impl PassthroughRemover {
    /// Create a pass-through remover recording why the real one is missing
    #[must_use]
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    /// Why background removal was skipped, if known
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl BackgroundRemover for PassthroughRemover {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn remove_background(&mut self, image: DynamicImage) -> Result<DynamicImage> {
        debug!(reason = ?self.reason, "Skipping background removal");
        Ok(image)
    }
}
