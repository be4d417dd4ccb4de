//! Record encoders
//!
//! Two encodings are available:
//!
//! - **Json**: one object per line, for log collectors
//! - **Console**: tab-separated, human-readable lines with fields rendered as
//!   a trailing JSON object and stack traces on their own lines
//!
//! Which keys are written, and how levels, timestamps and durations are
//! formatted, is controlled by [`EncoderConfig`]. An empty key omits that
//! element entirely.

mod console;
mod json;

use crate::entry::Entry;
use cairn_core_types::schema::{
    KEY_CALLER, KEY_LEVEL, KEY_LOGGER, KEY_MESSAGE, KEY_STACKTRACE, KEY_TIME,
};
use cairn_core_types::{Field, Level};
use std::io;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Console,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "console" => Ok(Encoding::Console),
            _ => Err(format!("unknown encoding: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    /// `info`
    Lowercase,
    /// `INFO`
    Capital,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// Floating-point seconds since the Unix epoch
    EpochSeconds,
    /// `2006-01-02T15:04:05.000Z`
    Iso8601,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFormat {
    /// Floating-point seconds
    Seconds,
    /// `1.5s`, `250ms`
    Human,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub level_format: LevelFormat,
    pub time_format: TimeFormat,
    pub duration_format: DurationFormat,
}

impl EncoderConfig {
    /// Machine-oriented defaults, with the message under `"message"`
    pub fn production() -> Self {
        Self {
            message_key: KEY_MESSAGE.to_string(),
            level_key: KEY_LEVEL.to_string(),
            time_key: KEY_TIME.to_string(),
            name_key: KEY_LOGGER.to_string(),
            caller_key: KEY_CALLER.to_string(),
            stacktrace_key: KEY_STACKTRACE.to_string(),
            level_format: LevelFormat::Lowercase,
            time_format: TimeFormat::EpochSeconds,
            duration_format: DurationFormat::Seconds,
        }
    }

    /// Human-oriented defaults with single-letter keys
    pub fn development() -> Self {
        Self {
            message_key: "M".to_string(),
            level_key: "L".to_string(),
            time_key: "T".to_string(),
            name_key: "N".to_string(),
            caller_key: "C".to_string(),
            stacktrace_key: "S".to_string(),
            level_format: LevelFormat::Capital,
            time_format: TimeFormat::Iso8601,
            duration_format: DurationFormat::Human,
        }
    }

    fn level_name(&self, level: Level) -> &'static str {
        match self.level_format {
            LevelFormat::Lowercase => level.as_str(),
            LevelFormat::Capital => level.as_capital_str(),
        }
    }
}

const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(encoding: Encoding, config: EncoderConfig) -> Self {
        Self { encoding, config }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Encode one record as a newline-terminated line
    ///
    /// `context` fields come from the logger and precede the call-site
    /// `fields`; order is preserved in the output.
    ///
    /// # Errors
    ///
    /// Returns an error only if a reflected value fails to serialize.
    pub fn encode(
        &self,
        entry: &Entry<'_>,
        context: &[Field],
        fields: &[Field],
    ) -> io::Result<Vec<u8>> {
        let encoded = match self.encoding {
            Encoding::Json => json::encode(&self.config, entry, context, fields),
            Encoding::Console => console::encode(&self.config, entry, context, fields),
        };
        encoded.map_err(io::Error::from)
    }
}
