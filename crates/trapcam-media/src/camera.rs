//! Camera channel process lifecycle.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use trapcam_models::{ChannelId, Framerate, Resolution};

use crate::error::{MediaError, MediaResult};
use crate::pipeline::{still_capture_command, video_capture_pipeline};
use crate::probe;
use crate::spawn::{CaptureHandle, CaptureSpawn, ShellSpawn};

/// Grace period for a capture process to exit after SIGINT before it is
/// killed outright.
pub const STOP_GRACE: Duration = Duration::from_secs(2);

/// One physical CSI camera and the capture process it owns.
///
/// A channel owns zero or one live process at any instant. The handle to a
/// spawned process is retained for its entire life; stopping signals that
/// exact process group instead of searching the host process table.
pub struct CsiCamera {
    id: ChannelId,
    name: String,
    quiet: bool,
    recording: bool,
    handle: Option<Box<dyn CaptureHandle>>,
    spawner: Box<dyn CaptureSpawn>,
}

impl CsiCamera {
    /// Open a channel against real hardware. Fails with
    /// [`MediaError::ModuleNotFound`] when the endpoint cannot be
    /// validated; callers must treat that as fatal for this channel.
    pub fn open(id: ChannelId, name: impl Into<String>, quiet: bool) -> MediaResult<Self> {
        let name = name.into();
        probe::check_gst_launch()?;
        if !probe::is_module_valid(id) {
            return Err(MediaError::module_not_found(name));
        }
        Ok(Self::with_spawner(id, name, quiet, Box::new(ShellSpawn)))
    }

    /// Build a channel around an explicit spawner, skipping hardware
    /// validation.
    pub fn with_spawner(
        id: ChannelId,
        name: impl Into<String>,
        quiet: bool,
        spawner: Box<dyn CaptureSpawn>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            quiet,
            recording: false,
            handle: None,
            spawner,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The channel's own view of its state. This can lag behind
    /// [`is_running`](Self::is_running): the process may exit on its own
    /// between flag updates.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Non-blocking poll of the owned process. `false` when no process was
    /// ever started.
    pub fn is_running(&mut self) -> bool {
        match self.handle.as_mut() {
            None => false,
            Some(handle) => matches!(handle.try_wait(), Ok(None)),
        }
    }

    /// Start recording an MP4 clip. An already-running capture is stopped
    /// and reaped first, so at most one process is live per channel.
    pub async fn start(
        &mut self,
        output: &Path,
        resolution: Resolution,
        framerate: Framerate,
    ) -> MediaResult<()> {
        if self.handle.is_some() {
            self.stop_and_wait(STOP_GRACE).await?;
        }

        let pipeline = video_capture_pipeline(self.id, resolution, framerate, output);
        let command = pipeline.launch_command();
        info!(
            channel = %self.id,
            name = %self.name,
            output = %output.display(),
            "starting video capture"
        );
        let handle = self.spawner.spawn(&command, self.quiet)?;
        self.handle = Some(handle);
        self.recording = true;
        Ok(())
    }

    /// Record for a fixed duration, then stop gracefully.
    pub async fn record_for(
        &mut self,
        output: &Path,
        resolution: Resolution,
        framerate: Framerate,
        duration: Duration,
    ) -> MediaResult<()> {
        self.start(output, resolution, framerate).await?;
        tokio::time::sleep(duration).await;
        self.stop_and_wait(STOP_GRACE).await
    }

    /// Capture a single JPEG frame. `image_res` is the capture tool's
    /// resolution scale (2-12).
    pub async fn capture_still(&mut self, output: &Path, image_res: u32) -> MediaResult<()> {
        if self.handle.is_some() {
            self.stop_and_wait(STOP_GRACE).await?;
        }
        let command = still_capture_command(self.id, image_res, output)?;
        info!(
            channel = %self.id,
            name = %self.name,
            output = %output.display(),
            "capturing still frame"
        );
        let handle = self.spawner.spawn(&command, self.quiet)?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Request the running capture to stop. A no-op on an idle channel.
    /// The channel counts as stopped once the signal is sent; the handle
    /// is kept so the exit can still be observed.
    pub fn stop(&mut self) -> MediaResult<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };
        debug!(channel = %self.id, "stopping video capture");
        let result = handle.interrupt();
        self.recording = false;
        result
    }

    /// Stop and wait for the process to exit, killing it if it ignores the
    /// interrupt past `grace`.
    pub async fn stop_and_wait(&mut self, grace: Duration) -> MediaResult<()> {
        let Some(mut handle) = self.handle.take() else {
            self.recording = false;
            return Ok(());
        };
        self.recording = false;

        if let Ok(Some(status)) = handle.try_wait() {
            debug!(channel = %self.id, ?status, "capture process already exited");
            return Ok(());
        }

        handle.interrupt()?;
        if !handle.wait_exit(grace).await? {
            warn!(
                channel = %self.id,
                "capture ignored interrupt after {:?}, killing",
                grace
            );
            handle.kill().await?;
            if !handle.wait_exit(grace).await? {
                return Err(MediaError::StopTimeout(grace));
            }
        }
        Ok(())
    }

    /// Signal the owned process group directly. Unlike [`stop`](Self::stop)
    /// this is an error when no process is active.
    pub fn interrupt(&mut self) -> MediaResult<()> {
        match self.handle.as_mut() {
            None => Err(MediaError::NoActiveProcess),
            Some(handle) => handle.interrupt(),
        }
    }
}
