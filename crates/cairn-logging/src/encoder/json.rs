use super::{DurationFormat, EncoderConfig, TimeFormat, ISO8601};
use crate::entry::Entry;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cairn_core_types::schema::CAUSES_SUFFIX;
use cairn_core_types::{Field, Value};
use chrono::{DateTime, Utc};

pub(super) fn encode(
    config: &EncoderConfig,
    entry: &Entry<'_>,
    context: &[Field],
    fields: &[Field],
) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(256);
    let mut obj = JsonObject::open(&mut buf, config);

    obj.str(&config.level_key, config.level_name(entry.level))?;
    if !config.time_key.is_empty() {
        obj.key(&config.time_key)?;
        obj.time(&entry.time)?;
    }
    if let Some(name) = entry.logger_name {
        obj.str(&config.name_key, name)?;
    }
    if let Some(caller) = entry.caller {
        obj.str(&config.caller_key, &caller.to_string())?;
    }
    obj.str(&config.message_key, entry.message)?;
    for field in context.iter().chain(fields) {
        obj.field(field)?;
    }
    if let Some(stack) = &entry.stack {
        obj.str(&config.stacktrace_key, stack)?;
    }
    obj.close();

    buf.push(b'\n');
    Ok(buf)
}

/// Writes a JSON object member by member, keeping insertion order
pub(super) struct JsonObject<'a> {
    buf: &'a mut Vec<u8>,
    config: &'a EncoderConfig,
    empty: bool,
}

impl<'a> JsonObject<'a> {
    pub(super) fn open(buf: &'a mut Vec<u8>, config: &'a EncoderConfig) -> Self {
        buf.push(b'{');
        Self {
            buf,
            config,
            empty: true,
        }
    }

    pub(super) fn close(self) {
        self.buf.push(b'}');
    }

    fn key(&mut self, key: &str) -> serde_json::Result<()> {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        serde_json::to_writer(&mut *self.buf, key)?;
        self.buf.push(b':');
        Ok(())
    }

    /// No-op when `key` is empty
    fn str(&mut self, key: &str, value: &str) -> serde_json::Result<()> {
        if key.is_empty() {
            return Ok(());
        }
        self.key(key)?;
        serde_json::to_writer(&mut *self.buf, value)
    }

    pub(super) fn field(&mut self, field: &Field) -> serde_json::Result<()> {
        self.key(field.key())?;
        match field.value() {
            Value::Error(err) => {
                serde_json::to_writer(&mut *self.buf, &err.message)?;
                if !err.causes.is_empty() {
                    self.key(&format!("{}{}", field.key(), CAUSES_SUFFIX))?;
                    serde_json::to_writer(&mut *self.buf, &err.causes)?;
                }
                Ok(())
            }
            value => self.value(value),
        }
    }

    fn value(&mut self, value: &Value) -> serde_json::Result<()> {
        match value {
            Value::Null => {
                self.buf.extend_from_slice(b"null");
                Ok(())
            }
            Value::Bool(b) => serde_json::to_writer(&mut *self.buf, b),
            Value::Int(i) => serde_json::to_writer(&mut *self.buf, i),
            Value::Uint(u) => serde_json::to_writer(&mut *self.buf, u),
            Value::Float(f) => self.float(*f),
            Value::Str(s) => serde_json::to_writer(&mut *self.buf, s),
            Value::Binary(bytes) => serde_json::to_writer(&mut *self.buf, &STANDARD.encode(bytes)),
            Value::Duration(d) => match self.config.duration_format {
                DurationFormat::Seconds => self.float(d.as_secs_f64()),
                DurationFormat::Human => serde_json::to_writer(&mut *self.buf, &format!("{d:?}")),
            },
            Value::Time(t) => self.time(t),
            Value::Error(err) => serde_json::to_writer(&mut *self.buf, &err.message),
            Value::Reflected(json) => serde_json::to_writer(&mut *self.buf, json),
        }
    }

    fn float(&mut self, f: f64) -> serde_json::Result<()> {
        // JSON has no representation for non-finite numbers
        if f.is_nan() {
            serde_json::to_writer(&mut *self.buf, "NaN")
        } else if f.is_infinite() {
            let s = if f > 0.0 { "+Inf" } else { "-Inf" };
            serde_json::to_writer(&mut *self.buf, s)
        } else {
            serde_json::to_writer(&mut *self.buf, &f)
        }
    }

    fn time(&mut self, t: &DateTime<Utc>) -> serde_json::Result<()> {
        match self.config.time_format {
            TimeFormat::EpochSeconds => self.float(epoch_seconds(t)),
            TimeFormat::Iso8601 => {
                serde_json::to_writer(&mut *self.buf, &t.format(ISO8601).to_string())
            }
        }
    }
}

pub(super) fn epoch_seconds(t: &DateTime<Utc>) -> f64 {
    t.timestamp_micros() as f64 / 1_000_000.0
}
