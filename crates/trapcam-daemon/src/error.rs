//! Trap controller error types.

use thiserror::Error;

pub type TrapResult<T> = Result<T, TrapError>;

#[derive(Debug, Error)]
pub enum TrapError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("sensor error: {0}")]
    Sensor(String),

    #[error("camera error: {0}")]
    Media(#[from] trapcam_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrapError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn sensor(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }
}
