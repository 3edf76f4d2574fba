//! Log-then-exit for unrecoverable startup failures.
//!
//! `tracing` has no level above `ERROR`, so fatal records are emitted at
//! `ERROR` under [`FATAL_TARGET`] with a `fatal = true` field. `ERROR` is the
//! highest threshold a logger can have, so the record is never filtered.

/// Target of every record emitted by [`fatal!`](crate::fatal).
pub const FATAL_TARGET: &str = "tracelevel::fatal";

/// Process exit status after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

#[doc(hidden)]
pub fn terminate() -> ! {
    std::process::exit(FATAL_EXIT_CODE)
}

/// Emit one record through `logger` and terminate the process with a
/// non-zero status. Never returns.
///
/// Takes the same field and message syntax as `tracing::error!`:
///
/// ```no_run
/// # let (logger, _handle) = tracelevel::logger::create(&Default::default());
/// # let err = "address in use";
/// tracelevel::fatal!(logger, error = %err, "failed to bind listener");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {{
        ($logger).in_scope(|| {
            $crate::__private::tracing::event!(
                target: $crate::logger::FATAL_TARGET,
                $crate::__private::tracing::Level::ERROR,
                fatal = true,
                $($arg)+
            )
        });
        $crate::logger::terminate()
    }};
}
