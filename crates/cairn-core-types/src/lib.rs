//! Core types shared across Cairn facilities
//!
//! This crate provides the vocabulary used by both the error facility and
//! the logging facade:
//!
//! - **Levels**: the seven record severities, Debug through Fatal
//! - **Fields**: typed key/value annotations attached to a record
//! - **Schema constants**: canonical keys used by the encoders

pub mod field;
pub mod level;
pub mod schema;

pub use field::{ErrorValue, Field, Value};
pub use level::{Level, ParseLevelError};
