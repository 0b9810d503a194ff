//! Service layer for the processing pipeline
//!
//! This module contains the stateless stages around background removal:
//! loading and writing files, resizing, and output normalization.

pub mod format;
pub mod io;
pub mod resize;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
pub use resize::ResizeService;
