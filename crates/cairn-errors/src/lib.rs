//! Error facility for Cairn
//!
//! The facade has exactly two failure modes, both raised outside of ordinary
//! logging: building the backend (`Configuration`) and flushing it (`Flush`).
//! Every [`LogError`] variant maps onto one of them through [`LogError::kind`],
//! and each kind carries a stable code for tests and operator tooling.

use cairn_core_types::ParseLevelError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Canonical error kind taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorKind {
    /// The backend could not be constructed
    Configuration,
    /// The sink could not be flushed
    Flush,
}

impl LogErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorKind::Configuration => "ERR_CONFIGURATION",
            LogErrorKind::Flush => "ERR_FLUSH",
        }
    }
}

#[derive(Debug, Error)]
pub enum LogError {
    /// A level override could not be parsed
    #[error("invalid level in {setting}: {source}")]
    InvalidLevel {
        setting: String,
        #[source]
        source: ParseLevelError,
    },

    /// An encoding override named neither `json` nor `console`
    #[error("invalid encoding in {setting}: {value:?} (expected \"json\" or \"console\")")]
    InvalidEncoding { setting: String, value: String },

    /// An output list was empty or contained an empty entry
    #[error("invalid output in {setting}: {value:?}")]
    InvalidOutput { setting: String, value: String },

    /// A file output could not be opened
    #[error("can't open output {}: {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The `tracing` bridge could not be installed as the global subscriber
    #[error("can't redirect tracing events: {reason}")]
    TracingBridge { reason: String },

    /// A sink refused to flush
    #[error("can't flush {sink}: {source}")]
    Flush {
        sink: String,
        #[source]
        source: io::Error,
    },
}

impl LogError {
    pub fn kind(&self) -> LogErrorKind {
        match self {
            LogError::InvalidLevel { .. }
            | LogError::InvalidEncoding { .. }
            | LogError::InvalidOutput { .. }
            | LogError::OpenOutput { .. }
            | LogError::TracingBridge { .. } => LogErrorKind::Configuration,
            LogError::Flush { .. } => LogErrorKind::Flush,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
