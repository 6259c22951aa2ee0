//! Camera channel identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CSI port id of a physical camera device, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u32);

impl ChannelId {
    /// Create a channel id for a CSI port.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw port number.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ChannelId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_display() {
        assert_eq!(ChannelId::new(0).to_string(), "0");
        assert_eq!(ChannelId::from(1).as_u32(), 1);
    }
}
