//! Convenience macros
//!
//! These macros are exported at the crate root.

/// Format a message and log it at Debug through the global logger
///
/// # Example
///
/// ```
/// cairn_logging::printf!("x={}", 5);
/// ```
#[macro_export]
macro_rules! printf {
    ($($arg:tt)*) => {
        $crate::printf(::core::format_args!($($arg)*))
    };
}

/// Build an array of fields, choosing each value's category as `any` would
///
/// # Example
///
/// ```
/// use cairn_logging::fields;
///
/// cairn_logging::info("request served", &fields!["status" => 200, "path" => "/health"]);
/// ```
#[macro_export]
macro_rules! fields {
    ($($key:expr => $value:expr),* $(,)?) => {
        [$($crate::field::any($key, $value)),*]
    };
}
