//! Record severity levels
//!
//! Levels are totally ordered: `Debug < Info < Warn < Error < DPanic < Panic < Fatal`.
//! The three levels above `Error` carry control-flow consequences that the
//! logger applies after the record is written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Verbose diagnostics, usually disabled in production
    Debug,
    /// Default priority
    Info,
    /// More important than Info, not yet an error
    Warn,
    /// High priority; a healthy application should not emit these
    Error,
    /// Development panic: panics in development mode only
    DPanic,
    /// Logs, then panics
    Panic,
    /// Logs, then terminates the process
    Fatal,
}

impl Level {
    /// Every level in ascending order
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    /// Lowercase name, as written by the production encoder
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase name, as written by the development encoder
    pub fn as_capital_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// `tracing` has no levels above ERROR, so the terminal levels collapse onto it.
impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error | Level::DPanic | Level::Panic | Level::Fatal => tracing::Level::ERROR,
        }
    }
}

/// TRACE has no counterpart and is folded into Debug.
impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            Level::Error
        } else if level == tracing::Level::WARN {
            Level::Warn
        } else if level == tracing::Level::INFO {
            Level::Info
        } else {
            Level::Debug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_is_monotonic() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should sort before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_level_names() {
        assert_eq!(Level::DPanic.as_str(), "dpanic");
        assert_eq!(Level::DPanic.as_capital_str(), "DPANIC");
        assert_eq!(Level::Warn.to_string(), "warn");
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
        assert_eq!(" warning ".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("dpanic".parse::<Level>(), Ok(Level::DPanic));
        assert_eq!(
            "verbose".parse::<Level>(),
            Err(ParseLevelError("verbose".to_string()))
        );
    }

    #[test]
    fn test_level_serde_uses_lowercase() {
        let json = serde_json::to_string(&Level::Fatal).unwrap();
        assert_eq!(json, "\"fatal\"");
        let back: Level = serde_json::from_str("\"dpanic\"").unwrap();
        assert_eq!(back, Level::DPanic);
    }

    #[test]
    fn test_tracing_level_conversions() {
        assert_eq!(tracing::Level::from(Level::Panic), tracing::Level::ERROR);
        assert_eq!(tracing::Level::from(Level::Warn), tracing::Level::WARN);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Debug);
        assert_eq!(Level::from(tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from(tracing::Level::ERROR), Level::Error);
    }
}
