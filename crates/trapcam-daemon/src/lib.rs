//! Camera trap controller.
//!
//! Composes two CSI camera channels and a motion sensor into a state
//! machine that records motion-triggered MP4 sessions under timing rules:
//! minimum/maximum recording duration, an activity threshold below which a
//! session is discarded, and a cooldown between sessions.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod sensor;

pub use config::TrapConfig;
pub use controller::{TrapController, TrapState};
pub use error::{TrapError, TrapResult};
pub use logging::SessionLogger;
pub use sensor::{MotionSensor, SimulatedSensor};
