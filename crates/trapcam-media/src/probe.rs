//! Capture endpoint validation.

use std::path::PathBuf;

use trapcam_models::ChannelId;

use crate::error::{MediaError, MediaResult};
use crate::pipeline::{GST_LAUNCH, NVGST_CAPTURE};

/// Locate gst-launch-1.0 on PATH.
pub fn check_gst_launch() -> MediaResult<PathBuf> {
    which::which(GST_LAUNCH).map_err(|_| MediaError::GstLaunchNotFound)
}

/// Locate nvgstcapture-1.0 on PATH.
pub fn check_nvgstcapture() -> MediaResult<PathBuf> {
    which::which(NVGST_CAPTURE).map_err(|_| MediaError::NvgstCaptureNotFound)
}

/// V4L2 device node backing a CSI port.
pub fn device_node(id: ChannelId) -> PathBuf {
    PathBuf::from(format!("/dev/video{}", id))
}

/// Whether the CSI port is backed by a live video device node.
pub fn is_module_valid(id: ChannelId) -> bool {
    device_node(id).exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_node_path() {
        assert_eq!(
            device_node(ChannelId::new(0)),
            PathBuf::from("/dev/video0")
        );
    }

    #[test]
    fn test_absent_port_is_invalid() {
        assert!(!is_module_valid(ChannelId::new(9999)));
    }
}
