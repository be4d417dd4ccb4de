//! Routes `tracing` events into the facade
//!
//! Libraries instrumented with `tracing` keep using its macros; with
//! [`redirect_tracing`] in place their events become ordinary facade records,
//! encoded and written by whatever logger is installed at the time of each
//! event.
//!
//! Mapping:
//! - TRACE and DEBUG become Debug; INFO, WARN and ERROR map one-to-one
//! - the `message` field becomes the record message
//! - the event's target is recorded under `"target"`, ahead of its fields
//! - the event's file and line become the caller

use crate::entry::Caller;
use crate::global;
use crate::logger::Logger;
use cairn_core_types::field::{self, ErrorValue};
use cairn_core_types::schema::KEY_TARGET;
use cairn_core_types::{Field, Level, Value};
use cairn_errors::LogError;
use std::fmt;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const MESSAGE_FIELD: &str = "message";

struct FieldVisitor {
    message: String,
    fields: Vec<Field>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
            fields: Vec::new(),
        }
    }

    fn push(&mut self, field: &TracingField, value: Value) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = format!("{:?}", value);
        } else {
            self.push(field, Value::Str(format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = value.to_string();
        } else {
            self.push(field, Value::Str(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, Value::Int(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, Value::Uint(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, Value::Float(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, Value::Bool(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::Error(ErrorValue::from_error(value)));
    }
}

/// A `tracing_subscriber` layer that re-emits events as facade records
///
/// By default records go to the global logger as it is at the time of each
/// event; [`FacadeLayer::with_logger`] pins a specific logger instead.
#[derive(Debug, Default)]
pub struct FacadeLayer {
    logger: Option<Logger>,
}

impl FacadeLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger: Some(logger),
        }
    }
}

impl<S> Layer<S> for FacadeLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        let level = Level::from(*metadata.level());
        let caller = metadata
            .file()
            .zip(metadata.line())
            .map(|(file, line)| Caller { file, line });

        let mut fields = Vec::with_capacity(visitor.fields.len() + 1);
        fields.push(field::string(KEY_TARGET, metadata.target()));
        fields.append(&mut visitor.fields);

        match &self.logger {
            Some(logger) => logger.log_with_caller(level, &visitor.message, &fields, caller),
            None => global::logger().log_with_caller(level, &visitor.message, &fields, caller),
        }
    }
}

/// Install [`FacadeLayer`] as the global `tracing` subscriber
///
/// # Errors
///
/// Returns [`LogError::TracingBridge`] if a global subscriber is already set.
pub fn redirect_tracing() -> Result<(), LogError> {
    tracing_subscriber::registry()
        .with(FacadeLayer::new())
        .try_init()
        .map_err(|e| LogError::TracingBridge {
            reason: e.to_string(),
        })
}
