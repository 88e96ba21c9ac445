#![deny(missing_docs)]
//! Shared logging utilities for the word-frequency workspace.
//!
//! This crate provides the `analytics_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger.
//!
//! Worker threads call [`set_worker_run`] once at startup so every line they
//! log is prefixed with `[run N]`. Host-side threads leave the tag unset.

use std::cell::Cell;

thread_local! {
    /// Run id served by the current worker thread, 0 when not a worker.
    static WORKER_RUN: Cell<u64> = const { Cell::new(0) };
}

/// Tags the current thread as the execution context of `run_id`.
pub fn set_worker_run(run_id: u64) {
    WORKER_RUN.with(|v| v.set(run_id));
}

/// Returns the run id this thread serves, if it is a worker thread.
pub fn worker_run() -> Option<u64> {
    match WORKER_RUN.with(|v| v.get()) {
        0 => None,
        run_id => Some(run_id),
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __analytics_log {
    ($level:ident, $($arg:tt)*) => {{
        match $crate::worker_run() {
            Some(run_id) => log::$level!("[run {}] {}", run_id, format_args!($($arg)*)),
            None => log::$level!($($arg)*),
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! analytics_trace {
    ($($arg:tt)*) => {{
        $crate::__analytics_log!(trace, $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! analytics_info {
    ($($arg:tt)*) => {{
        $crate::__analytics_log!(info, $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! analytics_debug {
    ($($arg:tt)*) => {{
        $crate::__analytics_log!(debug, $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! analytics_warn {
    ($($arg:tt)*) => {{
        $crate::__analytics_log!(warn, $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! analytics_error {
    ($($arg:tt)*) => {{
        $crate::__analytics_log!(error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
