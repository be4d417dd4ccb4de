//! Output destinations
//!
//! An [`Output`] is the configured description of where records go; opening
//! it yields a [`Sink`], the writer the backend actually holds.
//!
//! Outputs parse from strings: `stderr`, `stdout`, `daily:<path>` for a file
//! rolled over every day, and anything else is treated as a file path.

use cairn_errors::LogError;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

const DAILY_PREFIX: &str = "daily:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stderr,
    Stdout,
    /// Appended to, created if missing
    File(PathBuf),
    /// `<directory>/<prefix>.YYYY-MM-DD`, rotated at midnight UTC
    Daily { directory: PathBuf, prefix: String },
}

impl FromStr for Output {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err("empty output".to_string()),
            "stderr" => Ok(Output::Stderr),
            "stdout" => Ok(Output::Stdout),
            _ => match s.strip_prefix(DAILY_PREFIX) {
                Some(path) => {
                    let path = Path::new(path);
                    let prefix = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .ok_or_else(|| format!("daily output needs a file name: {s}"))?;
                    let directory = path
                        .parent()
                        .filter(|dir| !dir.as_os_str().is_empty())
                        .unwrap_or_else(|| Path::new("."));
                    Ok(Output::Daily {
                        directory: directory.to_path_buf(),
                        prefix: prefix.to_string(),
                    })
                }
                None => Ok(Output::File(PathBuf::from(s))),
            },
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stderr => f.write_str("stderr"),
            Output::Stdout => f.write_str("stdout"),
            Output::File(path) => write!(f, "{}", path.display()),
            Output::Daily { directory, prefix } => {
                write!(f, "{DAILY_PREFIX}{}", directory.join(prefix).display())
            }
        }
    }
}

impl Output {
    /// Open the destination for writing
    ///
    /// # Errors
    ///
    /// Returns [`LogError::OpenOutput`] if a file or rolling appender cannot
    /// be created.
    pub fn open(&self) -> Result<Sink, LogError> {
        let writer = match self {
            Output::Stderr => SinkWriter::Stderr(io::stderr()),
            Output::Stdout => SinkWriter::Stdout(io::stdout()),
            Output::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| LogError::OpenOutput {
                        path: path.clone(),
                        source,
                    })?;
                SinkWriter::File(BufWriter::new(file))
            }
            Output::Daily { directory, prefix } => {
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(prefix.as_str())
                    .build(directory)
                    .map_err(|e| LogError::OpenOutput {
                        path: directory.join(prefix),
                        source: io::Error::other(e),
                    })?;
                SinkWriter::Rolling(appender)
            }
        };
        Ok(Sink {
            name: self.to_string(),
            writer,
        })
    }
}

enum SinkWriter {
    Stderr(io::Stderr),
    Stdout(io::Stdout),
    File(BufWriter<File>),
    Rolling(RollingFileAppender),
    Custom(Box<dyn Write + Send>),
}

/// An open destination owned by a backend
pub struct Sink {
    name: String,
    writer: SinkWriter,
}

impl Sink {
    /// Wrap an arbitrary writer, e.g. an in-memory buffer
    pub fn custom(name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            writer: SinkWriter::Custom(Box::new(writer)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flush buffered bytes; plain files are also synced to disk
    ///
    /// # Errors
    ///
    /// Propagates the underlying I/O error.
    pub fn sync(&mut self) -> io::Result<()> {
        if let SinkWriter::File(w) = &mut self.writer {
            w.flush()?;
            return w.get_ref().sync_data();
        }
        self.flush()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.writer {
            SinkWriter::Stderr(w) => w.write(buf),
            SinkWriter::Stdout(w) => w.write(buf),
            SinkWriter::File(w) => w.write(buf),
            SinkWriter::Rolling(w) => w.write(buf),
            SinkWriter::Custom(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.writer {
            SinkWriter::Stderr(w) => w.flush(),
            SinkWriter::Stdout(w) => w.flush(),
            SinkWriter::File(w) => w.flush(),
            SinkWriter::Rolling(w) => w.flush(),
            SinkWriter::Custom(w) => w.flush(),
        }
    }
}
