//! Severity level catalogue.
//!
//! # Responsibilities
//! - Define the fixed, ordered set of severities a logger can be gated at
//! - Convert between levels and their canonical names (case-insensitive)
//! - Map catalogue levels onto `tracing::Level`
//!
//! # Design Decisions
//! - Closed catalogue: `debug < info < warn < error`
//! - Unknown names are a normal outcome (`None`), never a panic
//! - `Display` renders the uppercase form, the same text the encoder prints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minimum severity gating which records a logger emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

const CATALOGUE: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

impl Level {
    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    /// Integer rank; higher is more severe.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub fn from_rank(rank: u8) -> Option<Level> {
        CATALOGUE.get(rank as usize).copied()
    }

    /// Catalogue level for a `tracing` level. `TRACE` sits below the
    /// catalogue and has no counterpart.
    pub fn from_tracing(level: &tracing::Level) -> Option<Level> {
        match *level {
            tracing::Level::ERROR => Some(Level::Error),
            tracing::Level::WARN => Some(Level::Warn),
            tracing::Level::INFO => Some(Level::Info),
            tracing::Level::DEBUG => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_tracing(self) -> tracing::Level {
        match self {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let upper = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.pad(upper)
    }
}

/// All catalogue levels in ascending severity order.
///
/// Returns a fresh `Vec` each call; mutating it does not affect the catalogue.
pub fn levels() -> Vec<Level> {
    CATALOGUE.to_vec()
}

/// Catalogue names joined with `", "`, for human-facing error messages.
pub fn levels_string() -> String {
    CATALOGUE
        .iter()
        .map(|level| level.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Case-insensitive lookup by canonical name.
pub fn parse_level(name: &str) -> Option<Level> {
    CATALOGUE
        .iter()
        .copied()
        .find(|level| level.name().eq_ignore_ascii_case(name))
}

/// Error returned when a string names no catalogue level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level {input:?}, valid levels are: {}", levels_string())]
pub struct ParseLevelError {
    pub input: String,
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_level(s).ok_or_else(|| ParseLevelError {
            input: s.to_string(),
        })
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
