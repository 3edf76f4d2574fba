//! Runtime level control over HTTP.
//!
//! # Data Flow
//! ```text
//! host router (LevelHandle::mount(router, "/log") or nest_service)
//!     → handler.rs (method dispatch, last path segment)
//!     → level registry (parse)
//!     → LevelCell (shared with the logger)
//! ```
//!
//! # Design Decisions
//! - No routing inside the handler; the host decides the prefix
//! - Only catalogue level names are accepted
//! - Every failure maps to a status code and a short plain-text body

pub mod handler;

pub use handler::{ControlResponse, LevelHandle, USAGE_HINT};
