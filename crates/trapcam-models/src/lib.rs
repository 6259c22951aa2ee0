//! Shared data models for the trapcam camera-trap controller.
//!
//! This crate provides serde-serializable types for:
//! - Camera channel identity
//! - Capture geometry (resolution, framerate)
//! - Recording sessions and their outcomes

pub mod channel;
pub mod session;
pub mod video;

// Re-export common types
pub use channel::ChannelId;
pub use session::{RecordingSession, SessionId, SessionOutcome};
pub use video::{Framerate, Resolution, ResolutionParseError};
