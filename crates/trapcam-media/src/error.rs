//! Error types for capture operations.

use std::time::Duration;
use thiserror::Error;

/// Result type for capture operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving capture pipelines.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("gst-launch-1.0 not found in PATH")]
    GstLaunchNotFound,

    #[error("nvgstcapture-1.0 not found in PATH")]
    NvgstCaptureNotFound,

    #[error("camera module '{0}' not found")]
    ModuleNotFound(String),

    #[error("no active capture process")]
    NoActiveProcess,

    #[error("pipeline stage index {index} out of range for {len} stages")]
    StageIndex { index: usize, len: usize },

    #[error("image resolution scale {0} outside supported range 2-12")]
    InvalidImageRes(u32),

    #[error("capture process still running {0:?} after interrupt")]
    StopTimeout(Duration),

    #[error("failed to signal process group {pgid}: {source}")]
    Signal { pgid: i32, source: nix::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a module-not-found error.
    pub fn module_not_found(name: impl Into<String>) -> Self {
        Self::ModuleNotFound(name.into())
    }

    /// Create a stage-index error.
    pub fn stage_index(index: usize, len: usize) -> Self {
        Self::StageIndex { index, len }
    }
}
