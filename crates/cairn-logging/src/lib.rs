//! Cairn logging facade
//!
//! A process-wide structured logger behind a handful of free functions:
//!
//! - Single setup point via [`configure`] (production or development)
//! - Per-level functions ([`debug`] .. [`fatal`]) plus `*_e` variants that
//!   record an error under the `"error"` key
//! - Print-style compatibility functions ([`print`], [`println`], [`printf!`])
//! - A no-op default, so logging before setup is silently discarded
//! - Test capture mode for deterministic assertions
//! - A `tracing` bridge so instrumented libraries log through the facade
//!
//! # Usage
//!
//! ```no_run
//! use cairn_logging::{any, Mode};
//!
//! // Initialize once at application startup
//! cairn_logging::configure(Mode::Production, vec![any("service", "billing")]);
//!
//! cairn_logging::info("listening", &[any("port", 8080)]);
//!
//! // Flush before exit
//! cairn_logging::sync();
//! ```

pub mod backend;
pub mod bridge;
pub mod capture;
pub mod config;
pub mod encoder;
pub mod entry;
pub mod global;
pub mod level;
pub mod logger;
pub mod macros;
pub mod sink;

pub use cairn_core_types::field::{self, any, reflect};
pub use cairn_core_types::{schema, Field, Level, Value};
pub use cairn_errors::{LogError, LogErrorKind, Result};

pub use bridge::{redirect_tracing, FacadeLayer};
pub use capture::{init_test_capture, CapturedRecord, TestCapture};
pub use config::{Config, Mode};
pub use global::{
    configure, debug, debug_e, dpanic, dpanic_e, error, error_e, fatal, fatal_e, info, info_e, log,
    logger, panic, panic_e, print, println, printf, replace, sync, try_configure, try_sync, warn,
    warn_e,
};
pub use level::AtomicLevel;
pub use logger::{FatalHook, Logger};
