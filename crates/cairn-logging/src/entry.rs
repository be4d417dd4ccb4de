//! The unit handed from a `Logger` to its backend

use cairn_core_types::Level;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of the code that emitted a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Everything about a record except its fields
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub logger_name: Option<&'a str>,
    pub message: &'a str,
    pub caller: Option<Caller>,
    /// Rendered backtrace, present at or above the logger's stack-trace threshold
    pub stack: Option<String>,
}
