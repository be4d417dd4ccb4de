use super::json::{epoch_seconds, JsonObject};
use super::{EncoderConfig, TimeFormat, ISO8601};
use crate::entry::Entry;
use cairn_core_types::Field;

pub(super) fn encode(
    config: &EncoderConfig,
    entry: &Entry<'_>,
    context: &[Field],
    fields: &[Field],
) -> serde_json::Result<Vec<u8>> {
    let mut columns: Vec<String> = Vec::with_capacity(5);
    if !config.time_key.is_empty() {
        columns.push(match config.time_format {
            TimeFormat::Iso8601 => entry.time.format(ISO8601).to_string(),
            TimeFormat::EpochSeconds => epoch_seconds(&entry.time).to_string(),
        });
    }
    if !config.level_key.is_empty() {
        columns.push(config.level_name(entry.level).to_string());
    }
    if let (Some(name), false) = (entry.logger_name, config.name_key.is_empty()) {
        columns.push(name.to_string());
    }
    if let (Some(caller), false) = (entry.caller, config.caller_key.is_empty()) {
        columns.push(caller.to_string());
    }
    if !config.message_key.is_empty() {
        columns.push(entry.message.to_string());
    }

    let mut buf = columns.join("\t").into_bytes();

    if !context.is_empty() || !fields.is_empty() {
        buf.push(b'\t');
        let mut obj = JsonObject::open(&mut buf, config);
        for field in context.iter().chain(fields) {
            obj.field(field)?;
        }
        obj.close();
    }
    buf.push(b'\n');

    if let (Some(stack), false) = (&entry.stack, config.stacktrace_key.is_empty()) {
        buf.extend_from_slice(stack.as_bytes());
        buf.push(b'\n');
    }
    Ok(buf)
}
