//! Trap controller state machine.
//!
//! Composes the two camera channels and the motion sensor under the timing
//! rules: a session runs at least `rec_min_duration` and never longer than
//! `rec_max_duration`, is discarded when activity dies before
//! `active_threshold`, and a saved session is followed by a
//! `sleep_duration` cooldown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info};

use trapcam_media::{clip_path, discard_outputs, ensure_capture_dir, CsiCamera};
use trapcam_models::{ChannelId, RecordingSession, SessionOutcome};

use crate::config::TrapConfig;
use crate::error::TrapResult;
use crate::logging::SessionLogger;
use crate::sensor::MotionSensor;

/// Controller states. Transitions are driven by sensor polls and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapState {
    /// Waiting for activity.
    Idle,
    /// Recording started; activity must persist until the threshold.
    Arming,
    /// Committed recording session.
    Recording,
    /// Enforced idle period after a saved session.
    Cooldown,
}

struct ActiveSession {
    record: RecordingSession,
    started: Instant,
    logger: SessionLogger,
}

/// The camera trap: two CSI channels, one motion sensor, one state machine.
pub struct TrapController {
    config: TrapConfig,
    cam_0: CsiCamera,
    cam_1: CsiCamera,
    sensor: Box<dyn MotionSensor>,
    state: TrapState,
    session: Option<ActiveSession>,
    cooldown_until: Option<Instant>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl TrapController {
    /// Build a trap against real hardware. A channel validation failure is
    /// fatal for the trap; callers print a diagnostic and exit non-zero.
    pub async fn new(config: TrapConfig, sensor: Box<dyn MotionSensor>) -> TrapResult<Self> {
        config.validate()?;
        ensure_capture_dir(&config.capture_dir).await?;
        let cam_0 = CsiCamera::open(ChannelId::new(0), "cam_0", config.quiet)?;
        let cam_1 = CsiCamera::open(ChannelId::new(1), "cam_1", config.quiet)?;
        Ok(Self::with_parts(config, cam_0, cam_1, sensor))
    }

    /// Build a trap from explicit parts (used with injected spawners).
    pub fn with_parts(
        config: TrapConfig,
        cam_0: CsiCamera,
        cam_1: CsiCamera,
        sensor: Box<dyn MotionSensor>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            config,
            cam_0,
            cam_1,
            sensor,
            state: TrapState::Idle,
            session: None,
            cooldown_until: None,
            shutdown: Arc::new(shutdown),
        }
    }

    pub fn state(&self) -> TrapState {
        self.state
    }

    /// Handle for requesting shutdown from another task.
    pub fn shutdown_handle(&self) -> Arc<watch::Sender<bool>> {
        Arc::clone(&self.shutdown)
    }

    /// Drive the trap until shutdown is requested.
    pub async fn run(&mut self) -> TrapResult<()> {
        info!(
            dir = %self.config.capture_dir.display(),
            resolution = %self.config.resolution,
            framerate = %self.config.framerate,
            "camera trap armed"
        );

        let mut shutdown_rx = self.shutdown.subscribe();
        let mut ticker = tokio::time::interval(self.config.sensor_poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("shutdown requested, stopping camera trap");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.step().await?;
                }
            }
        }

        // Committed sessions survive a shutdown; an unconfirmed one does not.
        match self.state {
            TrapState::Recording => self.finish_session(SessionOutcome::Saved).await?,
            TrapState::Arming => self.finish_session(SessionOutcome::Discarded).await?,
            _ => {}
        }
        info!("camera trap stopped");
        Ok(())
    }

    /// One sensor poll and the resulting state transition.
    async fn step(&mut self) -> TrapResult<()> {
        let active = self.sensor.poll().await?;

        match self.state {
            TrapState::Idle => {
                if active {
                    self.begin_session().await?;
                }
            }
            TrapState::Arming => {
                if !active {
                    self.finish_session(SessionOutcome::Discarded).await?;
                } else if self.session_elapsed() >= self.config.active_threshold {
                    if let Some(session) = &self.session {
                        session
                            .logger
                            .log_progress("activity threshold met, session committed");
                    }
                    self.state = TrapState::Recording;
                }
            }
            TrapState::Recording => {
                let elapsed = self.session_elapsed();
                if elapsed >= self.config.rec_max_duration
                    || (!active && elapsed >= self.config.rec_min_duration)
                {
                    self.finish_session(SessionOutcome::Saved).await?;
                }
            }
            TrapState::Cooldown => {
                let expired = self
                    .cooldown_until
                    .map(|until| Instant::now() >= until)
                    .unwrap_or(true);
                if expired {
                    debug!("cooldown elapsed, trap idle");
                    self.cooldown_until = None;
                    self.state = TrapState::Idle;
                }
            }
        }
        Ok(())
    }

    fn session_elapsed(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.started.elapsed())
            .unwrap_or_default()
    }

    /// Start both channels on a fresh pair of clips.
    async fn begin_session(&mut self) -> TrapResult<()> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S").to_string();
        let outputs = vec![
            clip_path(
                &self.config.capture_dir,
                &format!("{}_{}", stamp, self.cam_0.name()),
            ),
            clip_path(
                &self.config.capture_dir,
                &format!("{}_{}", stamp, self.cam_1.name()),
            ),
        ];

        let record = RecordingSession::begin(outputs.clone());
        let logger = SessionLogger::new(&record.id, "dual_capture");
        logger.log_start("motion detected, starting dual capture");

        self.start_dual_capture(&outputs).await?;
        self.session = Some(ActiveSession {
            record,
            started: Instant::now(),
            logger,
        });
        self.state = TrapState::Arming;
        Ok(())
    }

    /// Start both channels. Channels are independent: a failure on one
    /// does not roll back or pause the other; the first error is reported.
    async fn start_dual_capture(&mut self, outputs: &[PathBuf]) -> TrapResult<()> {
        let resolution = self.config.resolution;
        let framerate = self.config.framerate;
        let r0 = self.cam_0.start(&outputs[0], resolution, framerate).await;
        let r1 = self.cam_1.start(&outputs[1], resolution, framerate).await;
        if let Err(e) = &r0 {
            error!(channel = %self.cam_0.id(), error = %e, "channel failed to start");
        }
        if let Err(e) = &r1 {
            error!(channel = %self.cam_1.id(), error = %e, "channel failed to start");
        }
        r0?;
        r1?;
        Ok(())
    }

    /// Stop both channels gracefully. Both are always attempted.
    async fn stop_dual_capture(&mut self) -> TrapResult<()> {
        let grace = self.config.stop_grace;
        let r0 = self.cam_0.stop_and_wait(grace).await;
        let r1 = self.cam_1.stop_and_wait(grace).await;
        r0?;
        r1?;
        Ok(())
    }

    /// Stop the session's channels and record its outcome.
    async fn finish_session(&mut self, outcome: SessionOutcome) -> TrapResult<()> {
        self.stop_dual_capture().await?;

        let Some(mut session) = self.session.take() else {
            self.state = TrapState::Idle;
            return Ok(());
        };
        session.record.finish(outcome);

        match outcome {
            SessionOutcome::Saved => {
                self.write_manifest(&session.record).await?;
                session.logger.log_completion("session saved");
                self.cooldown_until = Some(Instant::now() + self.config.sleep_duration);
                self.state = TrapState::Cooldown;
            }
            SessionOutcome::Discarded => {
                discard_outputs(&session.record.outputs).await;
                session
                    .logger
                    .log_warning("activity died before threshold, session discarded");
                self.state = TrapState::Idle;
            }
        }
        Ok(())
    }

    /// Write the session manifest next to the clips.
    async fn write_manifest(&self, record: &RecordingSession) -> TrapResult<()> {
        let path = self.config.capture_dir.join(format!("{}.json", record.id));
        let body = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(&path, body).await?;
        debug!(manifest = %path.display(), "session manifest written");
        Ok(())
    }
}
