//! Typed key/value fields attached to log records
//!
//! A [`Field`] pairs a key with a [`Value`] drawn from a closed set of
//! semantic categories. [`any`] picks the most specific category through the
//! `From` conversions below; [`reflect`] is the fallback for any
//! `serde::Serialize` type without a dedicated category.
//!
//! Byte sequences (`Vec<u8>`, `&[u8]`, byte arrays) are treated as opaque
//! binary blobs. A lone `u8` is an unsigned integer and a `char` is a
//! one-character string.
//!
//! # Example
//!
//! ```
//! use cairn_core_types::field::{any, Value};
//!
//! assert!(matches!(any("payload", vec![1u8, 2, 3]).value(), Value::Binary(_)));
//! assert_eq!(any("attempt", 1i32).value(), &Value::Int(1));
//! ```

use crate::schema::KEY_ERROR;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::time::{Duration, SystemTime};

/// Semantic category of a field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// Opaque bytes, base64 in JSON output
    Binary(Vec<u8>),
    Duration(Duration),
    Time(DateTime<Utc>),
    Error(ErrorValue),
    /// Generic serialized form for types without a dedicated category
    Reflected(serde_json::Value),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// An error flattened into its message and the messages of its source chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub message: String,
    pub causes: Vec<String>,
}

impl ErrorValue {
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
        }
    }
}

/// A key/value annotation on a single record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

// ========== Constructors ==========

/// Chooses the most specific representation of `value`
pub fn any(key: impl Into<String>, value: impl Into<Value>) -> Field {
    Field::new(key, value)
}

pub fn string(key: impl Into<String>, value: impl Into<String>) -> Field {
    Field::new(key, Value::Str(value.into()))
}

pub fn int(key: impl Into<String>, value: i64) -> Field {
    Field::new(key, Value::Int(value))
}

pub fn uint(key: impl Into<String>, value: u64) -> Field {
    Field::new(key, Value::Uint(value))
}

pub fn float(key: impl Into<String>, value: f64) -> Field {
    Field::new(key, Value::Float(value))
}

pub fn boolean(key: impl Into<String>, value: bool) -> Field {
    Field::new(key, Value::Bool(value))
}

pub fn binary(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Field {
    Field::new(key, Value::Binary(value.into()))
}

pub fn duration(key: impl Into<String>, value: Duration) -> Field {
    Field::new(key, Value::Duration(value))
}

pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Field {
    Field::new(key, Value::Time(value))
}

/// Records `err` under the conventional `"error"` key
pub fn error(err: &dyn std::error::Error) -> Field {
    named_error(KEY_ERROR, err)
}

pub fn named_error(key: impl Into<String>, err: &dyn std::error::Error) -> Field {
    Field::new(key, Value::Error(ErrorValue::from_error(err)))
}

/// Serializes `value` generically
///
/// If serialization fails the field is renamed to `<key>Error` and carries
/// the serializer's message instead.
pub fn reflect<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Field {
    let key = key.into();
    match serde_json::to_value(value) {
        Ok(json) => Field::new(key, Value::Reflected(json)),
        Err(e) => Field::new(format!("{key}Error"), Value::Str(e.to_string())),
    }
}

// ========== Conversions ==========

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! signed_into_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! unsigned_into_value {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

signed_into_value!(i8, i16, i32, i64, isize);
unsigned_into_value!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Value::Str(v.into_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(v: [u8; N]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(v: &[u8; N]) -> Self {
        Value::Binary(v.to_vec())
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<SystemTime> for Value {
    fn from(v: SystemTime) -> Self {
        Value::Time(DateTime::<Utc>::from(v))
    }
}

impl From<ErrorValue> for Value {
    fn from(v: ErrorValue) -> Self {
        Value::Error(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Reflected(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
