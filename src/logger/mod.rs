//! Logger construction.
//!
//! # Responsibilities
//! - Build a `tracing` dispatcher gated by a runtime-adjustable threshold
//! - Choose between the human-readable and the JSON encoder
//! - Attach static attributes and optional source locations to every record
//! - Hand out the control handle bound to the same threshold
//!
//! # Data Flow
//! ```text
//! create(config)
//!     → LevelCell (seeded with config.level)
//!     → Registry + fmt layer (stderr) filtered by ThresholdFilter(cell)
//!     → Logger (dispatcher)          LevelHandle (cell, initial level)
//!          │ every event reads cell        │ HTTP GET/PUT/DELETE reads/writes cell
//! ```
//!
//! # Design Decisions
//! - `create` installs nothing process-wide; `set_as_default` is the opt-in
//! - JSON encoding is delegated to `tracing_subscriber::fmt`; the text line is
//!   written by [`format::TextFormat`] so static attributes precede call fields

mod cell;
mod fatal;
mod filter;
mod format;

pub use cell::LevelCell;
pub use fatal::{terminate, FATAL_EXIT_CODE, FATAL_TARGET};

use tracing::dispatcher::{DefaultGuard, Dispatch};
use tracing_subscriber::fmt::{self, format::JsonFields, writer::BoxMakeWriter, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{Layer, Registry};

use crate::config::LoggingConfig;
use crate::control::LevelHandle;
use self::filter::ThresholdFilter;
use self::format::{JsonAttributes, TextFormat};

/// Errors from installing a logger process-wide.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("a global default logger is already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// A structured logger: a `tracing` dispatcher whose threshold is shared with
/// a [`LevelHandle`].
///
/// Records are emitted with the ordinary `tracing` macros while the logger is
/// the active dispatcher, either through [`Logger::in_scope`] or after
/// [`set_as_default`].
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the current dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Install this logger as the process-wide default dispatcher and route
    /// `log` crate records into it.
    pub fn install(&self) -> Result<(), LoggerError> {
        self.dispatch.clone().try_init()?;
        Ok(())
    }

    /// Make this logger the current thread's dispatcher until the guard drops.
    pub fn set_thread_default(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }
}

/// Create a logger writing to stderr, and its control handle.
pub fn create(config: &LoggingConfig) -> (Logger, LevelHandle) {
    create_with_writer(config, std::io::stderr)
}

/// Like [`create`], with records written to `make_writer`.
pub fn create_with_writer<W>(config: &LoggingConfig, make_writer: W) -> (Logger, LevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let cell = LevelCell::new(config.level);
    let attributes = config.attributes.clone().into();
    let writer = BoxMakeWriter::new(make_writer);

    let layer: Box<dyn Layer<Registry> + Send + Sync> = if config.json {
        let format = fmt::format()
            .json()
            .flatten_event(true)
            .with_file(config.add_source)
            .with_line_number(config.add_source);
        fmt::layer()
            .fmt_fields(JsonFields::new())
            .event_format(JsonAttributes::new(format, attributes))
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .event_format(TextFormat::new(attributes, config.add_source))
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    };

    let subscriber = Registry::default().with(layer.with_filter(ThresholdFilter::new(cell.clone())));
    let dispatch = Dispatch::new(subscriber);

    let handle = LevelHandle::new(cell, config.level, dispatch.clone());
    (Logger { dispatch }, handle)
}

/// Create a logger and install it as the process-wide default.
///
/// Only one global default can ever be installed; a second call fails with
/// [`LoggerError::AlreadyInstalled`]. Prefer passing the [`Logger`] from
/// [`create`] explicitly where possible.
pub fn set_as_default(config: &LoggingConfig) -> Result<LevelHandle, LoggerError> {
    let (logger, handle) = create(config);
    logger.install()?;
    Ok(handle)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::level::Level;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory sink for formatted records.
    #[derive(Clone, Default)]
    pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        pub(crate) fn lines(&self) -> Vec<String> {
            self.contents().lines().map(str::to_string).collect()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) fn capture_logger(config: &LoggingConfig) -> (Logger, LevelHandle, Capture) {
        let capture = Capture::default();
        let sink = capture.clone();
        let (logger, handle) = create_with_writer(config, move || sink.clone());
        (logger, handle, capture)
    }

    #[test]
    fn test_threshold_follows_cell() {
        let (logger, handle, capture) = capture_logger(&LoggingConfig::new(Level::Info));

        logger.in_scope(|| {
            tracing::debug!("dropped debug");
            tracing::info!("kept info");
        });
        handle.set_level(Level::Warn);
        logger.in_scope(|| {
            tracing::info!("dropped info");
            tracing::warn!("kept warn");
            tracing::error!("kept error");
        });

        let out = capture.contents();
        assert!(!out.contains("dropped"));
        assert!(out.contains("kept info"));
        assert!(out.contains("kept warn"));
        assert!(out.contains("kept error"));
    }

    #[test]
    fn test_trace_never_emitted() {
        let (logger, _handle, capture) = capture_logger(&LoggingConfig::new(Level::Debug));
        logger.in_scope(|| tracing::trace!("too fine"));
        assert!(capture.contents().is_empty());
    }

    #[test]
    fn test_fatal_record_passes_every_threshold() {
        for level in crate::level::levels() {
            let (logger, _handle, capture) = capture_logger(&LoggingConfig::new(level));
            logger.in_scope(|| {
                tracing::warn!("below error");
                tracing::event!(target: FATAL_TARGET, tracing::Level::ERROR, fatal = true, "giving up");
            });
            let out = capture.contents();
            assert!(out.contains("giving up"), "threshold {level}");
            assert!(out.contains("fatal=true"));
            assert_eq!(out.contains("below error"), level <= Level::Warn);
        }
    }

    #[test]
    fn test_text_static_attributes() {
        let config = LoggingConfig::new(Level::Info)
            .with_attribute("service", "billing")
            .with_attribute("region", "eu west");
        let (logger, _handle, capture) = capture_logger(&config);

        logger.in_scope(|| tracing::info!(order = 7, "placed"));

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.contains(" INFO "));
        assert!(line.ends_with(r#": placed service="billing" region="eu west" order=7"#));
    }

    #[test]
    fn test_text_source_comes_last() {
        let config = LoggingConfig::new(Level::Info)
            .with_source(true)
            .with_attribute("service", "billing");
        let (logger, _handle, capture) = capture_logger(&config);

        logger.in_scope(|| tracing::info!(order = 7, "located"));

        let line = &capture.lines()[0];
        let tail = line.split_once(": ").unwrap().1;
        let (fields, source) = tail.split_once(" source=").unwrap();
        assert_eq!(fields, r#"located service="billing" order=7"#);
        assert!(source.starts_with("src/logger/mod.rs:"));
        assert!(source["src/logger/mod.rs:".len()..].parse::<u32>().is_ok());
    }

    #[test]
    fn test_json_record_shape() {
        let config = LoggingConfig::new(Level::Info)
            .with_json(true)
            .with_attribute("service", "billing")
            .with_attribute("message", "must not override");
        let (logger, _handle, capture) = capture_logger(&config);

        logger.in_scope(|| tracing::warn!(order = 7, "placed"));

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(record["level"], "WARN");
        assert_eq!(record["message"], "placed");
        assert_eq!(record["order"], 7);
        assert_eq!(record["service"], "billing");
        assert!(record.get("timestamp").is_some());
        assert!(record.get("filename").is_none());

        let keys: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["timestamp", "level", "message", "service", "order", "target"]);
    }

    #[test]
    fn test_source_location() {
        let config = LoggingConfig::new(Level::Info).with_json(true).with_source(true);
        let (logger, _handle, capture) = capture_logger(&config);

        logger.in_scope(|| tracing::info!("located"));

        let record: serde_json::Value = serde_json::from_str(&capture.lines()[0]).unwrap();
        assert!(record["filename"].as_str().unwrap().ends_with("mod.rs"));
        assert!(record["line_number"].is_u64());
    }

    #[test]
    fn test_loggers_are_isolated() {
        let (first, first_handle, first_out) = capture_logger(&LoggingConfig::new(Level::Info));
        let (second, _second_handle, second_out) = capture_logger(&LoggingConfig::new(Level::Info));

        first_handle.set_level(Level::Error);
        first.in_scope(|| tracing::info!("first"));
        second.in_scope(|| tracing::info!("second"));

        assert!(first_out.contents().is_empty());
        assert!(second_out.contents().contains("second"));
    }
}
