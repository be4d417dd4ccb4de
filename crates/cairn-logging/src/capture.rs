//! Test capture mode for deterministic logging assertions
//!
//! This module provides an in-memory backend that keeps every record it is
//! given, so tests can assert on levels, messages, fields and stack traces
//! without parsing output.

use crate::backend::Core;
use crate::config::{Config, Mode};
use crate::entry::Entry;
use crate::global;
use crate::level::AtomicLevel;
use crate::logger::Logger;
use cairn_core_types::{Field, Level, Value};
use cairn_errors::LogError;
use std::io;
use std::sync::{Arc, Mutex};

/// A captured record with all its fields
#[derive(Clone, Debug)]
pub struct CapturedRecord {
    pub level: Level,
    pub logger_name: Option<String>,
    pub message: String,
    pub caller: Option<String>,
    pub stack: Option<String>,
    /// Context fields followed by call-site fields
    pub fields: Vec<Field>,
}

impl CapturedRecord {
    /// The first field named `key`
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.key() == key).map(Field::value)
    }
}

/// Backend half of a capture; hand it to [`Logger::new`]
pub struct CaptureCore {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
    level: AtomicLevel,
}

impl Core for CaptureCore {
    fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    fn write(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> io::Result<()> {
        let record = CapturedRecord {
            level: entry.level,
            logger_name: entry.logger_name.map(str::to_string),
            message: entry.message.to_string(),
            caller: entry.caller.map(|c| c.to_string()),
            stack: entry.stack.clone(),
            fields: context.iter().chain(fields).cloned().collect(),
        };

        self.records
            .lock()
            .map(|mut records| records.push(record))
            .ok();
        Ok(())
    }

    fn sync(&self) -> Result<(), LogError> {
        Ok(())
    }
}

/// Handle for accessing captured records in tests
#[derive(Clone)]
pub struct TestCapture {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl TestCapture {
    /// A capture that records every level
    pub fn new() -> (CaptureCore, TestCapture) {
        Self::with_level(AtomicLevel::new(Level::Debug))
    }

    pub fn with_level(level: AtomicLevel) -> (CaptureCore, TestCapture) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let core = CaptureCore {
            records: records.clone(),
            level,
        };
        (core, TestCapture { records })
    }

    /// Get all captured records
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Assert that a record exists with the given level and message
    ///
    /// # Panics
    ///
    /// Panics if the record is not found
    pub fn assert_record_exists(&self, level: Level, message: &str) {
        let records = self.records();
        let found = records
            .iter()
            .any(|r| r.level == level && r.message == message);
        assert!(
            found,
            "Expected record level={} message={:?} not found in {} captured records",
            level,
            message,
            records.len()
        );
    }

    /// Clear all captured records
    pub fn clear(&self) {
        self.records.lock().map(|mut r| r.clear()).ok();
    }

    /// Count records matching a predicate
    pub fn count_records<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedRecord) -> bool,
    {
        self.records().iter().filter(|r| predicate(r)).count()
    }
}

/// A capture-backed logger built with the same options `configure` would
/// apply for `mode`, including its minimum level
pub fn capture_logger(mode: Mode, fields: Vec<Field>) -> (Logger, TestCapture) {
    let config = Config::for_mode(mode, fields);
    let (core, capture) = TestCapture::with_level(config.level.clone());
    (config.apply(Logger::new(core)), capture)
}

/// Install a capture-backed logger in the global facade
///
/// The previous global logger is replaced. Tests that share a process
/// should serialize their use of the global facade.
///
/// # Example
///
/// ```
/// use cairn_logging::capture::init_test_capture;
/// use cairn_logging::{Level, Mode};
///
/// let capture = init_test_capture(Mode::Development, vec![]);
/// cairn_logging::info("my_operation", &[]);
/// capture.assert_record_exists(Level::Info, "my_operation");
/// ```
pub fn init_test_capture(mode: Mode, fields: Vec<Field>) -> TestCapture {
    let (logger, capture) = capture_logger(mode, fields);
    global::replace(logger);
    capture
}
