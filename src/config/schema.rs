//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the level
//! control server. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the level control handler is mounted.
    pub control: ControlConfig,

    /// Logger construction options.
    pub logging: LoggingConfig,

    /// Prometheus exporter settings.
    pub metrics: MetricsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Level control endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Path prefix the handler is nested under, e.g. "/log".
    pub path_prefix: String,

    /// Serve `GET /status`.
    pub status_endpoint: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/log".to_string(),
            status_endpoint: true,
        }
    }
}

/// Logger construction options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Starting threshold, also the target of a reset.
    pub level: Level,

    /// Annotate every record with file and line of the call site.
    pub add_source: bool,

    /// JSON records instead of human-readable lines.
    pub json: bool,

    /// Attached to every record, in order.
    pub attributes: Vec<Attribute>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            add_source: false,
            json: false,
            attributes: Vec::new(),
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(key, value));
        self
    }
}

/// A static key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Metrics exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Start the Prometheus scrape listener.
    pub enabled: bool,

    /// Scrape listener address.
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "127.0.0.1:9100".to_string(),
        }
    }
}
