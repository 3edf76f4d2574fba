//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! control handler (level set / reset)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! Structured logging itself lives in `crate::logger`.

pub mod metrics;
