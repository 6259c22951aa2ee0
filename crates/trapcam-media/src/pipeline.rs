//! Launch pipelines assembled as ordered stage lists.
//!
//! A pipeline stage is an opaque string handed to `gst-launch-1.0`
//! verbatim. Treating the pipeline as an editable sequence lets callers
//! adjust a capture recipe before execution and keeps the join policy in
//! one place.

use std::path::Path;

use trapcam_models::{ChannelId, Framerate, Resolution};

use crate::error::{MediaError, MediaResult};

/// External pipeline launcher binary.
pub const GST_LAUNCH: &str = "gst-launch-1.0";

/// Still-frame capture binary.
pub const NVGST_CAPTURE: &str = "nvgstcapture-1.0";

/// Separator placed between adjacent pipeline stages.
pub const STAGE_SEPARATOR: &str = " ! ";

/// Ordered, editable list of pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<String>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stages in execution order.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Add a stage after the current last stage. Stage content is not
    /// validated.
    pub fn append(&mut self, stage: impl Into<String>) {
        self.stages.push(stage.into());
    }

    /// Insert a stage at `index`. Inserting at `len` is equivalent to
    /// [`append`](Self::append); anything past that is an error, never a
    /// silent clamp.
    pub fn insert(&mut self, index: usize, stage: impl Into<String>) -> MediaResult<()> {
        if index > self.stages.len() {
            return Err(MediaError::stage_index(index, self.stages.len()));
        }
        self.stages.insert(index, stage.into());
        Ok(())
    }

    /// Remove and return the stage at `index`.
    pub fn remove(&mut self, index: usize) -> MediaResult<String> {
        if index >= self.stages.len() {
            return Err(MediaError::stage_index(index, self.stages.len()));
        }
        Ok(self.stages.remove(index))
    }

    /// Render the joined pipeline description. Does not mutate; the
    /// separator appears between consecutive stages only, never leading or
    /// trailing.
    pub fn render(&self) -> String {
        self.stages.join(STAGE_SEPARATOR)
    }

    /// Full launcher invocation for this pipeline. `-e` asks the launcher
    /// to finalize the container on interrupt.
    pub fn launch_command(&self) -> String {
        format!("{} {} -e", GST_LAUNCH, self.render())
    }
}

/// H.264 MP4 capture chain for one CSI channel.
pub fn video_capture_pipeline(
    channel: ChannelId,
    resolution: Resolution,
    framerate: Framerate,
    output: &Path,
) -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline.append(format!("nvarguscamerasrc sensor-id={}", channel));
    // The caps stage stays single-quoted: the command line goes through a
    // shell and the NVMM memory annotation contains shell metacharacters.
    pipeline.append(format!(
        "'video/x-raw(memory:NVMM),width={},height={},framerate={},format=NV12'",
        resolution.width,
        resolution.height,
        framerate.as_fraction(),
    ));
    pipeline.append("nvv4l2h264enc");
    pipeline.append("h264parse");
    pipeline.append("mp4mux");
    pipeline.append(format!("filesink location={}", output.display()));
    pipeline
}

/// Single-frame JPEG capture invocation. `image_res` is the capture tool's
/// resolution scale (2-12).
pub fn still_capture_command(
    channel: ChannelId,
    image_res: u32,
    output: &Path,
) -> MediaResult<String> {
    if !(2..=12).contains(&image_res) {
        return Err(MediaError::InvalidImageRes(image_res));
    }
    Ok(format!(
        "{} --sensor-id={} --image-res={} --automate --capture-auto --start-time=1 --file-name={}",
        NVGST_CAPTURE,
        channel,
        image_res,
        output.display(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn abc() -> Pipeline {
        let mut p = Pipeline::new();
        p.append("A");
        p.append("B");
        p.append("C");
        p
    }

    #[test]
    fn test_render_joins_between_stages_only() {
        let p = abc();
        assert_eq!(p.render(), "A ! B ! C");
        assert!(!p.render().starts_with(STAGE_SEPARATOR));
        assert!(!p.render().ends_with(STAGE_SEPARATOR));
    }

    #[test]
    fn test_render_is_idempotent() {
        let p = abc();
        let first = p.render();
        assert_eq!(p.render(), first);
        assert_eq!(p.render(), first);
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn test_append_then_remove_round_trips() {
        let mut p = abc();
        let before = p.render();
        p.append("D");
        assert_eq!(p.render(), "A ! B ! C ! D");
        p.remove(3).unwrap();
        assert_eq!(p.render(), before);
    }

    #[test]
    fn test_insert_at_len_is_append() {
        let mut p = abc();
        p.insert(3, "D").unwrap();
        assert_eq!(p.render(), "A ! B ! C ! D");

        let mut q = abc();
        q.insert(0, "Z").unwrap();
        assert_eq!(q.render(), "Z ! A ! B ! C");
    }

    #[test]
    fn test_insert_past_len_fails() {
        let mut p = abc();
        let err = p.insert(4, "D").unwrap_err();
        assert!(matches!(err, MediaError::StageIndex { index: 4, len: 3 }));
        // No silent clamp
        assert_eq!(p.render(), "A ! B ! C");
    }

    #[test]
    fn test_remove_out_of_range_fails() {
        let mut p = abc();
        assert!(matches!(
            p.remove(3),
            Err(MediaError::StageIndex { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_empty_pipeline_renders_empty() {
        assert_eq!(Pipeline::new().render(), "");
        assert!(Pipeline::new().is_empty());
    }

    #[test]
    fn test_video_capture_pipeline_matches_recording_chain() {
        let output = PathBuf::from("clips/vid_test_1.mp4");
        let p = video_capture_pipeline(
            ChannelId::new(0),
            Resolution::HD_720,
            Framerate::new(30),
            &output,
        );
        assert_eq!(
            p.launch_command(),
            "gst-launch-1.0 nvarguscamerasrc sensor-id=0 ! \
             'video/x-raw(memory:NVMM),width=1280,height=720,framerate=30/1,format=NV12' ! \
             nvv4l2h264enc ! h264parse ! mp4mux ! filesink location=clips/vid_test_1.mp4 -e"
        );
    }

    #[test]
    fn test_still_capture_command() {
        let cmd =
            still_capture_command(ChannelId::new(1), 4, &PathBuf::from("frame_01")).unwrap();
        assert_eq!(
            cmd,
            "nvgstcapture-1.0 --sensor-id=1 --image-res=4 --automate --capture-auto \
             --start-time=1 --file-name=frame_01"
        );
    }

    #[test]
    fn test_still_capture_rejects_bad_scale() {
        assert!(matches!(
            still_capture_command(ChannelId::new(0), 1, &PathBuf::from("f")),
            Err(MediaError::InvalidImageRes(1))
        ));
        assert!(matches!(
            still_capture_command(ChannelId::new(0), 13, &PathBuf::from("f")),
            Err(MediaError::InvalidImageRes(13))
        ));
    }
}
