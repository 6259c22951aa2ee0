//! Motion sensor contract.
//!
//! The controller only needs a boolean "activity detected" reading, so the
//! sensor is a capability behind a trait: a simulated implementation and a
//! hardware driver share the same contract.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::TrapResult;

/// A source of activity readings.
#[async_trait]
pub trait MotionSensor: Send + Sync {
    /// Current activity reading.
    async fn poll(&mut self) -> TrapResult<bool>;
}

// TODO: add a GPIO-backed PIR implementation once the sensor board is
// wired up; it only needs to implement `MotionSensor`.

/// Scripted sensor for tests and bench runs without the PIR board.
///
/// Yields readings from a script, then holds the final level forever.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSensor {
    script: VecDeque<bool>,
    level: bool,
}

impl SimulatedSensor {
    /// Sensor that never reports activity.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Sensor that replays `script`, then repeats the last reading.
    pub fn scripted(script: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: script.into_iter().collect(),
            level: false,
        }
    }
}

#[async_trait]
impl MotionSensor for SimulatedSensor {
    async fn poll(&mut self) -> TrapResult<bool> {
        if let Some(next) = self.script.pop_front() {
            self.level = next;
        }
        Ok(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_idle_sensor_never_triggers() {
        let mut sensor = SimulatedSensor::idle();
        for _ in 0..5 {
            assert!(!sensor.poll().await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_scripted_sensor_holds_final_level() {
        let mut sensor = SimulatedSensor::scripted([false, true]);
        assert!(!sensor.poll().await.unwrap());
        assert!(sensor.poll().await.unwrap());
        // Script exhausted: the last reading holds.
        assert!(sensor.poll().await.unwrap());
        assert!(sensor.poll().await.unwrap());
    }
}
