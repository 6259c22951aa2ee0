#![deny(unreachable_patterns)]
//! GStreamer CLI wrapper for CSI camera capture.
//!
//! This crate provides:
//! - Editable launch pipelines assembled from opaque stage strings
//! - Capture process spawning in a dedicated process group
//! - Camera channel lifecycle (start, stop, liveness) with direct
//!   ownership of the spawned process handle
//! - Capture directory helpers

pub mod camera;
pub mod error;
pub mod fs_utils;
pub mod pipeline;
pub mod probe;
pub mod spawn;

pub use camera::{CsiCamera, STOP_GRACE};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{clip_path, discard_outputs, ensure_capture_dir, CLIP_EXTENSION};
pub use pipeline::{
    still_capture_command, video_capture_pipeline, Pipeline, GST_LAUNCH, NVGST_CAPTURE,
    STAGE_SEPARATOR,
};
pub use probe::{check_gst_launch, check_nvgstcapture, device_node, is_module_valid};
pub use spawn::{CaptureHandle, CaptureSpawn, ShellSpawn};
