//! Canonical schema constants for structured log records
//!
//! These keys are the defaults of the production encoder; the development
//! encoder uses its own short keys.

// Entry keys
pub const KEY_LEVEL: &str = "level";
pub const KEY_TIME: &str = "ts";
pub const KEY_LOGGER: &str = "logger";
pub const KEY_CALLER: &str = "caller";
pub const KEY_MESSAGE: &str = "message";
pub const KEY_STACKTRACE: &str = "stacktrace";

// Field keys
pub const KEY_ERROR: &str = "error";
pub const KEY_TARGET: &str = "target";

/// Suffix appended to an error field's key to carry its source chain
pub const CAUSES_SUFFIX: &str = "Causes";
