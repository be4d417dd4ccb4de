//! The process-wide logger and its convenience functions
//!
//! The global handle starts out as a no-op logger, so code that logs before
//! [`configure`] runs (unit tests, library code used standalone) never
//! fails. Configuration replaces the handle through an atomic pointer swap;
//! log calls already in flight finish against the logger they loaded.
//!
//! `configure` is expected once, early in `main`. Replacing the handle again
//! is allowed.

use crate::config::{Config, Mode};
use crate::logger::Logger;
use arc_swap::ArcSwap;
use cairn_core_types::field;
use cairn_core_types::{Field, Level};
use cairn_errors::Result;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<ArcSwap<Logger>> = LazyLock::new(|| ArcSwap::from_pointee(Logger::nop()));

/// The current global logger
pub fn logger() -> Arc<Logger> {
    GLOBAL.load_full()
}

/// Install `logger` globally, returning the one it replaces
pub fn replace(logger: Logger) -> Arc<Logger> {
    GLOBAL.swap(Arc::new(logger))
}

/// Build the logger for `mode` and install it globally
///
/// `fields` are attached to every record in production mode and ignored in
/// development mode. `CAIRN_LOG_*` environment overrides are applied.
///
/// # Errors
///
/// Returns a configuration error if an override is invalid or an output
/// cannot be opened; the global logger is left unchanged.
pub fn try_configure(mode: Mode, fields: Vec<Field>) -> Result<()> {
    let logger = Config::for_mode(mode, fields).with_env()?.build()?;
    replace(logger);
    Ok(())
}

/// Like [`try_configure`], but a failure is fatal
///
/// # Panics
///
/// Panics with the configuration error if the logger cannot be built.
pub fn configure(mode: Mode, fields: Vec<Field>) {
    if let Err(err) = try_configure(mode, fields) {
        panic!("can't initialize logger: {err}");
    }
}

/// Flush the global logger
///
/// # Errors
///
/// Returns a flush error naming the sink that failed.
pub fn try_sync() -> Result<()> {
    GLOBAL.load().sync()
}

/// Like [`try_sync`], but a failure is fatal
///
/// # Panics
///
/// Panics with the flush error if a sink cannot be flushed.
pub fn sync() {
    if let Err(err) = try_sync() {
        panic!("logger sync failed: {err}");
    }
}

#[track_caller]
pub fn log(level: Level, message: &str, fields: &[Field]) {
    GLOBAL.load().log(level, message, fields);
}

#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    GLOBAL.load().debug(message, fields);
}

#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    GLOBAL.load().info(message, fields);
}

#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    GLOBAL.load().warn(message, fields);
}

#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    GLOBAL.load().error(message, fields);
}

/// Panics afterwards if the global logger is in development mode
#[track_caller]
pub fn dpanic(message: &str, fields: &[Field]) {
    GLOBAL.load().dpanic(message, fields);
}

#[track_caller]
pub fn panic(message: &str, fields: &[Field]) -> ! {
    GLOBAL.load().panic(message, fields)
}

#[track_caller]
pub fn fatal(message: &str, fields: &[Field]) -> ! {
    GLOBAL.load().fatal(message, fields)
}

// ========== Error-carrying variants ==========
//
// Each records `err` under the "error" key.

#[track_caller]
pub fn debug_e(message: &str, err: &dyn Error) {
    debug(message, &[field::error(err)]);
}

#[track_caller]
pub fn info_e(message: &str, err: &dyn Error) {
    info(message, &[field::error(err)]);
}

#[track_caller]
pub fn warn_e(message: &str, err: &dyn Error) {
    warn(message, &[field::error(err)]);
}

#[track_caller]
pub fn error_e(message: &str, err: &dyn Error) {
    error(message, &[field::error(err)]);
}

#[track_caller]
pub fn dpanic_e(message: &str, err: &dyn Error) {
    dpanic(message, &[field::error(err)]);
}

#[track_caller]
pub fn panic_e(message: &str, err: &dyn Error) -> ! {
    panic(message, &[field::error(err)])
}

#[track_caller]
pub fn fatal_e(message: &str, err: &dyn Error) -> ! {
    fatal(message, &[field::error(err)])
}

// ========== Print-style compatibility ==========
//
// For call sites that expect a bare print interface. Everything goes out at
// Debug with no fields.

/// Concatenates `values` with no separator
///
/// Operands are only seen through `Display`, so no space is inserted even
/// between two numbers: `print(&[&1, &2])` logs `"12"`. Use [`println`] for
/// space-separated output.
#[track_caller]
pub fn print(values: &[&dyn fmt::Display]) {
    let message: String = values.iter().map(ToString::to_string).collect();
    debug(&message, &[]);
}

/// Joins `values` with spaces and appends a newline
#[track_caller]
pub fn println(values: &[&dyn fmt::Display]) {
    let mut message = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    message.push('\n');
    debug(&message, &[]);
}

/// Usually invoked through the [`printf!`](crate::printf!) macro
#[track_caller]
pub fn printf(args: fmt::Arguments<'_>) {
    debug(&fmt::format(args), &[]);
}
