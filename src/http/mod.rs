//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → <prefix>/*  → control::LevelHandle (level get/set/reset)
//!     → /status     → JSON status
//!     → Send to client
//! ```

pub mod server;

pub use server::{LevelServer, STATUS_PATH};
