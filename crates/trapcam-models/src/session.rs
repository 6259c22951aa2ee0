//! Recording session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a recording session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final disposition of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Activity persisted past the threshold; clips are kept.
    Saved,
    /// Activity died off before the threshold; clips are deleted.
    Discarded,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Saved => "saved",
            SessionOutcome::Discarded => "discarded",
        }
    }
}

/// One motion-triggered recording across both camera channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSession {
    /// Unique session ID
    pub id: SessionId,

    /// When the session began
    pub started_at: DateTime<Utc>,

    /// When the session ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Output clips, one per channel
    pub outputs: Vec<PathBuf>,

    /// Disposition, set once the session finishes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SessionOutcome>,
}

impl RecordingSession {
    /// Start a new session over the given output clips.
    pub fn begin(outputs: Vec<PathBuf>) -> Self {
        Self {
            id: SessionId::new(),
            started_at: Utc::now(),
            ended_at: None,
            outputs,
            outcome: None,
        }
    }

    /// Close the session with its final outcome.
    pub fn finish(&mut self, outcome: SessionOutcome) {
        self.ended_at = Some(Utc::now());
        self.outcome = Some(outcome);
    }

    /// Wall-clock duration, once finished.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|ended| ended - self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut session = RecordingSession::begin(vec![PathBuf::from("a.mp4")]);
        assert!(session.ended_at.is_none());
        assert!(session.outcome.is_none());
        assert!(session.duration().is_none());

        session.finish(SessionOutcome::Saved);
        assert_eq!(session.outcome, Some(SessionOutcome::Saved));
        assert!(session.duration().is_some());
    }

    #[test]
    fn test_outcome_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&SessionOutcome::Discarded).unwrap(),
            "\"discarded\""
        );
        assert_eq!(SessionOutcome::Saved.as_str(), "saved");
    }

    #[test]
    fn test_session_manifest_round_trip() {
        let mut session = RecordingSession::begin(vec![
            PathBuf::from("/var/lib/trapcam/20260807T101500_cam_0.mp4"),
            PathBuf::from("/var/lib/trapcam/20260807T101500_cam_1.mp4"),
        ]);
        session.finish(SessionOutcome::Saved);

        let json = serde_json::to_string(&session).unwrap();
        let parsed: RecordingSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, session.id);
        assert_eq!(parsed.outputs.len(), 2);
        assert_eq!(parsed.outcome, Some(SessionOutcome::Saved));
    }
}
