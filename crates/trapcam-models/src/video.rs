//! Capture geometry definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 720p, the dual-camera recording default.
    pub const HD_720: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    /// 1080p.
    pub const HD_1080: Resolution = Resolution {
        width: 1920,
        height: 1080,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error parsing a `WIDTHxHEIGHT` resolution string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid resolution '{0}', expected WIDTHxHEIGHT")]
pub struct ResolutionParseError(pub String);

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| ResolutionParseError(s.to_string()))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| ResolutionParseError(s.to_string()))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| ResolutionParseError(s.to_string()))?;
        Ok(Self { width, height })
    }
}

/// Capture framerate in frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Framerate(pub u32);

impl Framerate {
    pub const fn new(fps: u32) -> Self {
        Self(fps)
    }

    pub const fn fps(&self) -> u32 {
        self.0
    }

    /// GStreamer caps fraction form, e.g. `30/1`.
    pub fn as_fraction(&self) -> String {
        format!("{}/1", self.0)
    }
}

impl fmt::Display for Framerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse() {
        assert_eq!("1280x720".parse::<Resolution>().unwrap(), Resolution::HD_720);
        assert_eq!(
            "1920X1080".parse::<Resolution>().unwrap(),
            Resolution::HD_1080
        );
        assert!("1280".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_display_round_trip() {
        let res = Resolution::new(640, 480);
        assert_eq!(res.to_string().parse::<Resolution>().unwrap(), res);
    }

    #[test]
    fn test_framerate_fraction() {
        assert_eq!(Framerate::new(30).as_fraction(), "30/1");
        assert_eq!(Framerate::new(30).fps(), 30);
    }
}
