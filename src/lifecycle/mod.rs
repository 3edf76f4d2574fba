//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown_signal() resolves
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber wakes → server stops accepting → drains → exits
//! ```
//!
//! # Design Decisions
//! - Signal handling is kept out of the server so tests can drive shutdown directly

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
