//! Record encoders with static attribute support.
//!
//! Both encodings lay a record out the same way: header (timestamp, level),
//! message, static attributes, per-call fields, then target and source
//! location.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::Attribute;

/// Human-readable line encoder.
///
/// ```text
/// 2026-10-16T09:30:00.000000Z  INFO app::orders: placed service="billing" order=7 source=src/orders.rs:42
/// ```
pub(crate) struct TextFormat {
    timer: SystemTime,
    attributes: Arc<[Attribute]>,
    add_source: bool,
}

impl TextFormat {
    pub(crate) fn new(attributes: Arc<[Attribute]>, add_source: bool) -> Self {
        Self {
            timer: SystemTime,
            attributes,
            add_source,
        }
    }
}

impl<S, N> FormatEvent<S, N> for TextFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        self.timer.format_time(&mut writer)?;
        write!(writer, " {:>5} ", meta.level().as_str())?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                writer.write_str(span.name())?;
                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                writer.write_char(':')?;
            }
            writer.write_char(' ')?;
        }
        write!(writer, "{}:", meta.target())?;

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        if let Some(message) = &fields.message {
            write!(writer, " {message}")?;
        }
        for attr in self.attributes.iter() {
            write!(writer, " {}={:?}", attr.key, attr.value)?;
        }
        for (name, value) in &fields.fields {
            write!(writer, " {name}={value}")?;
        }
        if self.add_source {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                write!(writer, " source={file}:{line}")?;
            }
        }
        writeln!(writer)
    }
}

/// Splits an event into its message and the remaining fields, in call order.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, rendered: String) {
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name(), rendered));
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Wraps the JSON encoder and splices the static attributes into every
/// record right after the header and message.
///
/// A key the encoder or the call site already wrote is left untouched.
pub(crate) struct JsonAttributes<F> {
    inner: F,
    attributes: Arc<[Attribute]>,
}

impl<F> JsonAttributes<F> {
    pub(crate) fn new(inner: F, attributes: Arc<[Attribute]>) -> Self {
        Self { inner, attributes }
    }

    fn splice(&self, line: &str) -> Result<String, fmt::Error> {
        let record: Map<String, Value> = serde_json::from_str(line).map_err(|_| fmt::Error)?;
        let mut spliced = Map::with_capacity(record.len() + self.attributes.len());
        let mut pending = true;

        for (key, value) in &record {
            if pending && !matches!(key.as_str(), "timestamp" | "level" | "message") {
                self.insert_attributes(&record, &mut spliced);
                pending = false;
            }
            spliced.insert(key.clone(), value.clone());
        }
        if pending {
            self.insert_attributes(&record, &mut spliced);
        }

        serde_json::to_string(&spliced).map_err(|_| fmt::Error)
    }

    fn insert_attributes(&self, record: &Map<String, Value>, spliced: &mut Map<String, Value>) {
        for attr in self.attributes.iter() {
            if !record.contains_key(&attr.key) {
                spliced.insert(attr.key.clone(), Value::String(attr.value.clone()));
            }
        }
    }
}

impl<S, N, F> FormatEvent<S, N> for JsonAttributes<F>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    F: FormatEvent<S, N>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if self.attributes.is_empty() {
            return self.inner.format_event(ctx, writer, event);
        }

        let mut buf = String::new();
        self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
        writeln!(writer, "{}", self.splice(buf.trim_end_matches('\n'))?)
    }
}
