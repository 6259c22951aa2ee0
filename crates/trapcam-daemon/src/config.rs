//! Trap configuration.

use std::path::PathBuf;
use std::time::Duration;

use trapcam_models::{Framerate, Resolution};

use crate::error::{TrapError, TrapResult};

/// Camera trap configuration.
#[derive(Debug, Clone)]
pub struct TrapConfig {
    /// Directory receiving finished clips and session manifests
    pub capture_dir: PathBuf,
    /// Recording resolution
    pub resolution: Resolution,
    /// Recording framerate
    pub framerate: Framerate,
    /// Enforced minimum duration of a recording session
    pub rec_min_duration: Duration,
    /// Enforced maximum duration of a recording session
    pub rec_max_duration: Duration,
    /// Activity must persist this long from session start or the recording
    /// is discarded
    pub active_threshold: Duration,
    /// Enforced idle period after a saved session
    pub sleep_duration: Duration,
    /// Sensor polling cadence
    pub sensor_poll_interval: Duration,
    /// How long a capture process may take to exit after interrupt
    pub stop_grace: Duration,
    /// Silence capture process output
    pub quiet: bool,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            capture_dir: PathBuf::from("/var/lib/trapcam"),
            resolution: Resolution::HD_720,
            framerate: Framerate::new(30),
            rec_min_duration: Duration::from_secs(10),
            rec_max_duration: Duration::from_secs(120),
            active_threshold: Duration::from_secs(3),
            sleep_duration: Duration::from_secs(30),
            sensor_poll_interval: Duration::from_millis(500),
            stop_grace: trapcam_media::STOP_GRACE,
            quiet: true,
        }
    }
}

impl TrapConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capture_dir: std::env::var("TRAP_CAPTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.capture_dir),
            resolution: std::env::var("TRAP_RESOLUTION")
                .ok()
                .and_then(|s| s.parse::<Resolution>().ok())
                .unwrap_or(defaults.resolution),
            framerate: std::env::var("TRAP_FRAMERATE")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .map(Framerate::new)
                .unwrap_or(defaults.framerate),
            rec_min_duration: env_secs("TRAP_REC_MIN_SECS", defaults.rec_min_duration),
            rec_max_duration: env_secs("TRAP_REC_MAX_SECS", defaults.rec_max_duration),
            active_threshold: env_secs("TRAP_ACTIVE_THRESHOLD_SECS", defaults.active_threshold),
            sleep_duration: env_secs("TRAP_SLEEP_SECS", defaults.sleep_duration),
            sensor_poll_interval: env_millis(
                "TRAP_POLL_INTERVAL_MS",
                defaults.sensor_poll_interval,
            ),
            stop_grace: env_secs("TRAP_STOP_GRACE_SECS", defaults.stop_grace),
            quiet: std::env::var("TRAP_QUIET")
                .ok()
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(defaults.quiet),
        }
    }

    /// Check the timing parameters are mutually consistent.
    pub fn validate(&self) -> TrapResult<()> {
        if self.rec_max_duration < self.rec_min_duration {
            return Err(TrapError::config(format!(
                "rec_max_duration {:?} is shorter than rec_min_duration {:?}",
                self.rec_max_duration, self.rec_min_duration
            )));
        }
        if self.active_threshold > self.rec_min_duration {
            return Err(TrapError::config(format!(
                "active_threshold {:?} exceeds rec_min_duration {:?}",
                self.active_threshold, self.rec_min_duration
            )));
        }
        if self.sensor_poll_interval.is_zero() {
            return Err(TrapError::config("sensor_poll_interval must be non-zero"));
        }
        Ok(())
    }
}

fn env_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(default)
}

fn env_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        TrapConfig::default().validate().unwrap();
    }

    #[test]
    fn test_max_shorter_than_min_rejected() {
        let config = TrapConfig {
            rec_min_duration: Duration::from_secs(30),
            rec_max_duration: Duration::from_secs(10),
            ..TrapConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrapError::Config(_))));
    }

    #[test]
    fn test_threshold_exceeding_min_rejected() {
        let config = TrapConfig {
            active_threshold: Duration::from_secs(20),
            rec_min_duration: Duration::from_secs(10),
            ..TrapConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrapError::Config(_))));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = TrapConfig {
            sensor_poll_interval: Duration::ZERO,
            ..TrapConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrapError::Config(_))));
    }
}
