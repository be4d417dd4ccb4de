//! Logger configuration
//!
//! A [`Config`] describes a backend declaratively; [`Config::build`] opens its
//! outputs and produces a [`Logger`]. Two presets cover the common cases:
//!
//! - **Production**: Info and above, JSON to stderr, stack traces from Error
//! - **Development**: Debug and above, console lines to stderr, stack traces
//!   from Warn, DPanic panics
//!
//! # Environment Variables
//!
//! [`Config::with_env`] applies these overrides on top of a preset:
//!
//! - `CAIRN_LOG_LEVEL`: minimum level (`debug`, `info`, `warn`, `error`,
//!   `dpanic`, `panic`, `fatal`)
//! - `CAIRN_LOG_ENCODING`: `json` or `console`
//! - `CAIRN_LOG_OUTPUT`: comma-separated outputs (`stderr`, `stdout`,
//!   `daily:<path>`, or a file path)

use crate::backend::WriterCore;
use crate::encoder::{Encoder, EncoderConfig, Encoding};
use crate::level::AtomicLevel;
use crate::logger::{FatalHook, Logger};
use crate::sink::Output;
use cairn_core_types::{Field, Level};
use cairn_errors::{LogError, Result};
use std::str::FromStr;

pub const ENV_LEVEL: &str = "CAIRN_LOG_LEVEL";
pub const ENV_ENCODING: &str = "CAIRN_LOG_ENCODING";
pub const ENV_OUTPUT: &str = "CAIRN_LOG_OUTPUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Structured JSON output with pre-attached fields
    Production,
    /// Human-readable output; DPanic panics
    Development,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            _ => Err(format!("unknown mode: {s}. Use 'production' or 'development'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared with the built backend; keep a clone to change it at runtime
    pub level: AtomicLevel,
    pub development: bool,
    pub encoding: Encoding,
    pub encoder: EncoderConfig,
    pub outputs: Vec<Output>,
    pub disable_caller: bool,
    pub stacktrace_level: Option<Level>,
    pub initial_fields: Vec<Field>,
    pub name: Option<String>,
    pub fatal_hook: FatalHook,
}

impl Config {
    pub fn production() -> Self {
        Self {
            level: AtomicLevel::new(Level::Info),
            development: false,
            encoding: Encoding::Json,
            encoder: EncoderConfig::production(),
            outputs: vec![Output::Stderr],
            disable_caller: false,
            stacktrace_level: Some(Level::Error),
            initial_fields: Vec::new(),
            name: None,
            fatal_hook: FatalHook::default(),
        }
    }

    pub fn development() -> Self {
        Self {
            level: AtomicLevel::new(Level::Debug),
            development: true,
            encoding: Encoding::Console,
            encoder: EncoderConfig::development(),
            outputs: vec![Output::Stderr],
            disable_caller: false,
            stacktrace_level: Some(Level::Warn),
            initial_fields: Vec::new(),
            name: None,
            fatal_hook: FatalHook::default(),
        }
    }

    /// The configuration the global facade installs for `mode`
    ///
    /// Both modes attach stack traces from Warn. `fields` are attached to
    /// every record in production and ignored in development.
    pub fn for_mode(mode: Mode, fields: Vec<Field>) -> Self {
        match mode {
            Mode::Production => Self {
                stacktrace_level: Some(Level::Warn),
                initial_fields: fields,
                ..Self::production()
            },
            Mode::Development => Self {
                stacktrace_level: Some(Level::Warn),
                ..Self::development()
            },
        }
    }

    /// Apply `CAIRN_LOG_*` overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any variable holds an invalid value.
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `CAIRN_LOG_*` overrides read through `lookup`
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any variable holds an invalid value.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = lookup(ENV_LEVEL) {
            let level = value.parse::<Level>().map_err(|source| LogError::InvalidLevel {
                setting: ENV_LEVEL.to_string(),
                source,
            })?;
            self.level.set_level(level);
        }

        if let Some(value) = lookup(ENV_ENCODING) {
            self.encoding = value
                .parse::<Encoding>()
                .map_err(|_| LogError::InvalidEncoding {
                    setting: ENV_ENCODING.to_string(),
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup(ENV_OUTPUT) {
            self.outputs = value
                .split(',')
                .map(|part| {
                    part.parse::<Output>().map_err(|_| LogError::InvalidOutput {
                        setting: ENV_OUTPUT.to_string(),
                        value: value.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(self)
    }

    /// Open every output and build the logger
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidOutput`] if there are no outputs and
    /// [`LogError::OpenOutput`] if one cannot be opened.
    pub fn build(&self) -> Result<Logger> {
        if self.outputs.is_empty() {
            return Err(LogError::InvalidOutput {
                setting: "outputs".to_string(),
                value: String::new(),
            });
        }
        let sinks = self
            .outputs
            .iter()
            .map(Output::open)
            .collect::<Result<Vec<_>>>()?;

        let encoder = Encoder::new(self.encoding, self.encoder.clone());
        let core = WriterCore::new(encoder, self.level.clone(), sinks);
        Ok(self.apply(Logger::new(core)))
    }

    /// Apply every option except the backend to `logger`
    pub fn apply(&self, logger: Logger) -> Logger {
        let logger = logger
            .development(self.development)
            .with_caller(!self.disable_caller)
            .with_stacktrace(self.stacktrace_level)
            .with_fatal_hook(self.fatal_hook)
            .with(self.initial_fields.iter().cloned());
        match &self.name {
            Some(name) => logger.named(name),
            None => logger,
        }
    }
}
