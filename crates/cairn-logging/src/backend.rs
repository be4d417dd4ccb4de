//! Backends: the seam between a `Logger` and its output
//!
//! A [`Core`] decides whether a level is enabled, turns an entry plus its
//! fields into output, and flushes that output on request. Implementations
//! must tolerate concurrent calls from any number of threads.

use crate::encoder::Encoder;
use crate::entry::Entry;
use crate::level::AtomicLevel;
use crate::sink::Sink;
use cairn_core_types::{Field, Level};
use cairn_errors::LogError;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

pub trait Core: Send + Sync {
    /// Whether records at `level` would be written
    fn enabled(&self, level: Level) -> bool;

    /// Write one record
    ///
    /// # Errors
    ///
    /// Returns the first encoding or I/O error; the logger reports it
    /// out-of-band rather than to its caller.
    fn write(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> io::Result<()>;

    /// Flush buffered output
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Flush`] naming the sink that failed.
    fn sync(&self) -> Result<(), LogError>;
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NopCore;

impl Core for NopCore {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn write(&self, _entry: &Entry<'_>, _context: &[Field], _fields: &[Field]) -> io::Result<()> {
        Ok(())
    }

    fn sync(&self) -> Result<(), LogError> {
        Ok(())
    }
}

/// Encodes records and writes them to one or more sinks
///
/// Sinks sit behind a single mutex so that a line is never interleaved with
/// another thread's output.
#[derive(Debug)]
pub struct WriterCore {
    encoder: Encoder,
    level: AtomicLevel,
    sinks: Mutex<Vec<Sink>>,
}

impl WriterCore {
    pub fn new(encoder: Encoder, level: AtomicLevel, sinks: Vec<Sink>) -> Self {
        Self {
            encoder,
            level,
            sinks: Mutex::new(sinks),
        }
    }
}

impl Core for WriterCore {
    fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    fn write(&self, entry: &Entry<'_>, context: &[Field], fields: &[Field]) -> io::Result<()> {
        let line = self.encoder.encode(entry, context, fields)?;
        let mut sinks = self.sinks.lock().unwrap_or_else(PoisonError::into_inner);

        // Every sink gets the line even if an earlier one failed
        let mut first_err = None;
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.write_all(&line) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn sync(&self) -> Result<(), LogError> {
        let mut sinks = self.sinks.lock().unwrap_or_else(PoisonError::into_inner);
        for sink in sinks.iter_mut() {
            sink.sync().map_err(|source| LogError::Flush {
                sink: sink.name().to_string(),
                source,
            })?;
        }
        Ok(())
    }
}
