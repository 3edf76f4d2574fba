//! Runtime-adjustable structured logging.
//!
//! [`logger::create`] builds a `tracing` logger together with a
//! [`LevelHandle`] that shares its minimum level. The handle is a
//! `tower::Service`, so it can be mounted under any path prefix to read
//! (`GET`), change (`PUT`/`POST <prefix>/<level>`) or reset (`DELETE`) the
//! level of a running process.
//!
//! ```no_run
//! use axum::Router;
//! use tracelevel::{logger, Level, LoggingConfig};
//!
//! let (logger, handle) = logger::create(&LoggingConfig::new(Level::Info).with_json(true));
//! let app: Router = Router::new().nest_service("/log", handle);
//! logger.in_scope(|| tracing::info!("ready"));
//! ```

pub mod build_info;
pub mod config;
pub mod control;
pub mod http;
pub mod level;
pub mod lifecycle;
pub mod logger;
pub mod observability;

pub use build_info::{log_build_info, BuildInfo};
pub use config::{Attribute, LoggingConfig, ServerConfig};
pub use control::LevelHandle;
pub use level::{levels, levels_string, parse_level, Level};
pub use logger::{create, set_as_default, Logger};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
