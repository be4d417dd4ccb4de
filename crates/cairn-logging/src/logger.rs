//! The logger handle
//!
//! A [`Logger`] wraps a backend with the options that shape each record:
//! context fields merged into every record, an optional name, whether the
//! caller's location is reported, the level from which stack traces are
//! attached, and the control-flow consequences of the terminal levels.
//!
//! Every logging method is `#[track_caller]`, so the reported caller is the
//! code that called into the logger (or into the global facade), never the
//! logger itself.
//!
//! # Terminal levels
//!
//! | level | after writing |
//! |---|---|
//! | `DPanic` | panics in development mode, otherwise nothing |
//! | `Panic` | always panics |
//! | `Fatal` | applies the [`FatalHook`], exiting with status 1 by default |
//!
//! These consequences apply even when the level is disabled; the record is
//! synced to its sinks before panicking or exiting.

use crate::backend::{Core, NopCore};
use crate::entry::{Caller, Entry};
use cairn_core_types::{Field, Level};
use cairn_errors::LogError;
use chrono::Utc;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// What a Fatal record does once written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalHook {
    /// Terminate the process with this status
    Exit(i32),
    /// Panic instead, so a test harness can observe the record
    Panic,
}

impl Default for FatalHook {
    fn default() -> Self {
        FatalHook::Exit(1)
    }
}

#[derive(Clone)]
pub struct Logger {
    core: Arc<dyn Core>,
    name: Option<String>,
    context: Vec<Field>,
    development: bool,
    add_caller: bool,
    stacktrace_level: Option<Level>,
    fatal_hook: FatalHook,
}

impl Logger {
    /// A logger over `core` with every option off
    pub fn new(core: impl Core + 'static) -> Self {
        Self::from_core(Arc::new(core))
    }

    pub fn from_core(core: Arc<dyn Core>) -> Self {
        Self {
            core,
            name: None,
            context: Vec::new(),
            development: false,
            add_caller: false,
            stacktrace_level: None,
            fatal_hook: FatalHook::default(),
        }
    }

    /// Discards every record; terminal levels still panic or exit
    pub fn nop() -> Self {
        Self::new(NopCore)
    }

    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    pub fn with_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    /// Attach stack traces to records at or above `level`; `None` disables them
    pub fn with_stacktrace(mut self, level: Option<Level>) -> Self {
        self.stacktrace_level = level;
        self
    }

    pub fn with_fatal_hook(mut self, hook: FatalHook) -> Self {
        self.fatal_hook = hook;
        self
    }

    /// A child logger whose records also carry `fields`
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut child = self.clone();
        child.context.extend(fields);
        child
    }

    /// A child logger with `name` appended to this logger's name, dot-separated
    pub fn named(&self, name: &str) -> Self {
        let mut child = self.clone();
        child.name = Some(match &self.name {
            Some(parent) if !name.is_empty() => format!("{parent}.{name}"),
            Some(parent) => parent.clone(),
            None => name.to_string(),
        });
        child
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        let caller = Caller::from_location(Location::caller());
        self.log_with_caller(level, message, fields, Some(caller));
    }

    /// Like [`Logger::log`] with an explicit caller, for records that
    /// originate outside Rust call frames (e.g. bridged `tracing` events)
    ///
    /// Terminal-level panics still report the Rust call site.
    #[track_caller]
    pub fn log_with_caller(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        caller: Option<Caller>,
    ) {
        if self.core.enabled(level) {
            self.write(level, message, fields, caller);
        }
        self.finish(level, message);
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Panics afterwards if this logger is in development mode
    #[track_caller]
    pub fn dpanic(&self, message: &str, fields: &[Field]) {
        self.log(Level::DPanic, message, fields);
    }

    #[track_caller]
    pub fn panic(&self, message: &str, fields: &[Field]) -> ! {
        self.log(Level::Panic, message, fields);
        unreachable!("panic level always unwinds")
    }

    #[track_caller]
    pub fn fatal(&self, message: &str, fields: &[Field]) -> ! {
        self.log(Level::Fatal, message, fields);
        unreachable!("fatal level always exits or unwinds")
    }

    /// Flush the backend
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Flush`] if a sink cannot be flushed.
    pub fn sync(&self) -> Result<(), LogError> {
        self.core.sync()
    }

    fn write(&self, level: Level, message: &str, fields: &[Field], caller: Option<Caller>) {
        let stack = self
            .stacktrace_level
            .filter(|threshold| level >= *threshold)
            .map(|_| Backtrace::force_capture().to_string());

        let entry = Entry {
            level,
            time: Utc::now(),
            logger_name: self.name.as_deref(),
            message,
            caller: caller.filter(|_| self.add_caller),
            stack,
        };

        if let Err(err) = self.core.write(&entry, &self.context, fields) {
            report_internal_error("write", &err);
        }
        if level > Level::Error {
            if let Err(err) = self.core.sync() {
                report_internal_error("sync", &err);
            }
        }
    }

    #[track_caller]
    fn finish(&self, level: Level, message: &str) {
        match level {
            Level::DPanic if self.development => panic!("{message}"),
            Level::Panic => panic!("{message}"),
            Level::Fatal => match self.fatal_hook {
                FatalHook::Exit(code) => std::process::exit(code),
                FatalHook::Panic => panic!("{message}"),
            },
            _ => {}
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("development", &self.development)
            .field("add_caller", &self.add_caller)
            .field("stacktrace_level", &self.stacktrace_level)
            .field("fatal_hook", &self.fatal_hook)
            .finish_non_exhaustive()
    }
}

/// Backend failures never reach the caller; they go to stderr instead
fn report_internal_error(op: &str, err: &dyn fmt::Display) {
    eprintln!(
        "{} cairn {op} error: {err}",
        Utc::now().format("%Y-%m-%d %H:%M:%S%.6f UTC")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::TestCapture;
    use cairn_core_types::field;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn capture() -> (Logger, TestCapture) {
        let (core, capture) = TestCapture::new();
        (Logger::new(core), capture)
    }

    fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
        payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_default()
    }

    #[test]
    fn test_nop_logger_accepts_all_non_terminal_levels() {
        let logger = Logger::nop();
        logger.debug("d", &[]);
        logger.info("i", &[]);
        logger.warn("w", &[]);
        logger.error("e", &[]);
        logger.dpanic("dp", &[]);
        assert!(logger.sync().is_ok());
    }

    #[test]
    fn test_context_fields_come_first() {
        let (logger, capture) = capture();
        let child = logger.with([field::string("service", "api")]);
        child.info("ready", &[field::int("port", 80)]);

        let records = capture.records();
        let keys: Vec<_> = records[0].fields.iter().map(|f| f.key().to_string()).collect();
        assert_eq!(keys, vec!["service", "port"]);
    }

    #[test]
    fn test_with_does_not_affect_parent() {
        let (logger, capture) = capture();
        let _child = logger.with([field::string("k", "v")]);
        logger.info("parent", &[]);
        assert!(capture.records()[0].fields.is_empty());
    }

    #[test]
    fn test_named_joins_with_dot() {
        let logger = Logger::nop().named("db").named("pool");
        assert_eq!(logger.name(), Some("db.pool"));
        assert_eq!(logger.named("").name(), Some("db.pool"));
    }

    #[test]
    fn test_caller_reports_call_site() {
        let (logger, capture) = capture();
        let logger = logger.with_caller(true);
        let line = line!() + 1;
        logger.info("here", &[]);

        let caller = capture.records()[0].caller.clone().unwrap();
        assert!(caller.ends_with(&format!("logger.rs:{line}")), "{caller}");
    }

    #[test]
    fn test_caller_omitted_when_disabled() {
        let (logger, capture) = capture();
        logger.info("here", &[]);
        assert!(capture.records()[0].caller.is_none());
    }

    #[test]
    fn test_stacktrace_threshold() {
        let (logger, capture) = capture();
        let logger = logger.with_stacktrace(Some(Level::Warn));
        logger.info("quiet", &[]);
        logger.warn("loud", &[]);
        logger.error("louder", &[]);

        let records = capture.records();
        assert!(records[0].stack.is_none());
        assert!(records[1].stack.is_some());
        assert!(records[2].stack.is_some());
    }

    #[test]
    fn test_dpanic_only_panics_in_development() {
        let (logger, capture) = capture();
        logger.dpanic("tolerated", &[]);

        let dev = logger.clone().development(true);
        let result = catch_unwind(AssertUnwindSafe(|| dev.dpanic("should not happen", &[])));
        assert_eq!(panic_message(result.unwrap_err()), "should not happen");

        assert_eq!(capture.count_records(|r| r.level == Level::DPanic), 2);
    }

    #[test]
    fn test_panic_writes_then_unwinds() {
        let (logger, capture) = capture();
        let result = catch_unwind(AssertUnwindSafe(|| {
            logger.panic("boom", &[field::int("code", 3)])
        }));
        assert_eq!(panic_message(result.unwrap_err()), "boom");
        capture.assert_record_exists(Level::Panic, "boom");
    }

    #[test]
    fn test_panic_unwinds_even_when_disabled() {
        let result = catch_unwind(|| Logger::nop().panic("silent", &[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_fatal_hook_panic_is_observable() {
        let (logger, capture) = capture();
        let logger = logger.with_fatal_hook(FatalHook::Panic);
        let result = catch_unwind(AssertUnwindSafe(|| logger.fatal("down", &[])));
        assert!(result.is_err());
        capture.assert_record_exists(Level::Fatal, "down");
    }

    #[test]
    fn test_fatal_hook_defaults_to_exit_one() {
        assert_eq!(FatalHook::default(), FatalHook::Exit(1));
    }
}
