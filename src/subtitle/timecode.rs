//! SRT timecodes.
//!
//! A timecode is a millisecond-precision position in the track, written
//! as `HH:MM:SS,mmm`. Conversion to and from floating-point seconds is
//! lossless at millisecond precision.

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzerError;

/// A position in the subtitle track with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode {
    millis: u64,
}

impl Timecode {
    /// Create a timecode from a millisecond count
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Create a timecode from a seconds value, rounding to milliseconds
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self {
            millis: (seconds * 1000.0).round() as u64,
        }
    }

    /// Total milliseconds
    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Position as floating-point seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }
}

impl FromStr for Timecode {
    type Err = AnalyzerError;

    /// Parse a timecode in the `HH:MM:SS,mmm` format
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyzerError::InvalidTimecode(s.to_string());

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let hours: u64 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u64 = parts[1].parse().map_err(|_| invalid())?;

        let seconds_parts: Vec<&str> = parts[2].split(',').collect();
        if seconds_parts.len() != 2 || seconds_parts[1].len() != 3 {
            return Err(invalid());
        }

        let seconds: u64 = seconds_parts[0].parse().map_err(|_| invalid())?;
        let milliseconds: u64 = seconds_parts[1].parse().map_err(|_| invalid())?;

        if minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        Ok(Self::from_millis(
            hours * 3_600_000 + minutes * 60_000 + seconds * 1000 + milliseconds,
        ))
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.millis % 1000;
        let total_sec = self.millis / 1000;
        let s = total_sec % 60;
        let total_min = total_sec / 60;
        let m = total_min % 60;
        let h = total_min / 60;
        write!(f, "{:02}:{:02}:{:02},{:03}", h, m, s, ms)
    }
}

impl Serialize for Timecode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timecode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
