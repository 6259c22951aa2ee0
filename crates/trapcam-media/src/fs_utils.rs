//! Capture directory utilities.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;

use crate::error::MediaResult;

/// Fixed extension for capture clips.
pub const CLIP_EXTENSION: &str = "mp4";

/// Create the capture output directory if missing.
pub async fn ensure_capture_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    fs::create_dir_all(dir.as_ref()).await?;
    Ok(())
}

/// Output path for a clip: `<dir>/<stem>.mp4`.
pub fn clip_path(dir: impl AsRef<Path>, stem: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.{}", stem, CLIP_EXTENSION))
}

/// Delete session outputs, best effort. Clips that were never written (a
/// capture interrupted before the muxer finalized) are skipped silently;
/// other failures are logged and do not abort the sweep.
pub async fn discard_outputs(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove discarded clip");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_capture_dir_creates_nested() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("clips").join("2026");
        ensure_capture_dir(&target).await.unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_clip_path_has_fixed_extension() {
        let path = clip_path("/var/lib/trapcam", "20260807T101500_cam_0");
        assert_eq!(
            path,
            PathBuf::from("/var/lib/trapcam/20260807T101500_cam_0.mp4")
        );
    }

    #[tokio::test]
    async fn test_discard_outputs_removes_existing_and_skips_missing() {
        let dir = TempDir::new().unwrap();
        let written = dir.path().join("a.mp4");
        let missing = dir.path().join("b.mp4");
        fs::write(&written, b"clip").await.unwrap();

        discard_outputs(&[written.clone(), missing]).await;

        assert!(!written.exists());
    }
}
