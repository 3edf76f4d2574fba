//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tracelevel_level_changes_total` (counter): level writes by action (`set`, `reset`)
//! - `tracelevel_current_level` (gauge): rank of the active threshold (debug=0 … error=3)
//!
//! The gauge is set from the level cell right after each write. Two writes
//! racing each other can briefly leave it one write behind the cell; the
//! cell itself stays authoritative.
//!
//! Without an installed recorder the macros are no-ops, so libraries embedding
//! the handler pay nothing unless the host exports metrics.

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::level::Level;

pub const LEVEL_CHANGES_TOTAL: &str = "tracelevel_level_changes_total";
pub const CURRENT_LEVEL: &str = "tracelevel_current_level";

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(LEVEL_CHANGES_TOTAL, "Log level changes by action");
    describe_gauge!(CURRENT_LEVEL, "Rank of the current minimum log level");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Count a level write and publish `current`, the cell's value after it.
pub fn record_level_change(action: &'static str, current: Level) {
    counter!(LEVEL_CHANGES_TOTAL, "action" => action).increment(1);
    gauge!(CURRENT_LEVEL).set(f64::from(current.rank()));
}
