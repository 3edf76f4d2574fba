//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the control path prefix
//! - Keep the control prefix clear of the status endpoint
//! - Reject static attribute keys the encoders already own
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ServerConfig;
use crate::http::server::STATUS_PATH;

/// Keys written by the text and JSON encoders themselves.
pub const RESERVED_KEYS: &[&str] = &[
    "timestamp",
    "level",
    "target",
    "message",
    "filename",
    "line_number",
    "fields",
];

/// Characters the router reads as path parameters or wildcards.
const ROUTE_SYNTAX: [char; 3] = ['{', '}', '*'];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid listener.bind_address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics.address {0:?}")]
    MetricsAddress(String),

    #[error("listener.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error(
        "control.path_prefix {0:?} must start with '/', not end with '/' and not contain '{{', '}}' or '*'"
    )]
    PathPrefix(String),

    #[error("control.path_prefix {0:?} collides with the status endpoint")]
    PrefixConflict(String),

    #[error("logging.attributes[{0}] has an empty key")]
    EmptyAttributeKey(usize),

    #[error("logging.attributes key {0:?} is defined more than once")]
    DuplicateAttributeKey(String),

    #[error("logging.attributes key {0:?} is reserved by the log encoder")]
    ReservedAttributeKey(String),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.metrics.enabled && config.metrics.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(config.metrics.address.clone()));
    }

    let prefix = &config.control.path_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains(ROUTE_SYNTAX) {
        errors.push(ValidationError::PathPrefix(prefix.clone()));
    } else if config.control.status_endpoint && prefix == STATUS_PATH {
        errors.push(ValidationError::PrefixConflict(prefix.clone()));
    }

    let mut seen = HashSet::new();
    for (i, attr) in config.logging.attributes.iter().enumerate() {
        if attr.key.trim().is_empty() {
            errors.push(ValidationError::EmptyAttributeKey(i));
            continue;
        }
        if RESERVED_KEYS.contains(&attr.key.as_str()) {
            errors.push(ValidationError::ReservedAttributeKey(attr.key.clone()));
        }
        if !seen.insert(attr.key.as_str()) {
            errors.push(ValidationError::DuplicateAttributeKey(attr.key.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
