#![deny(missing_docs)]
//! Shared logging utilities for the datestream workspace.
//!
//! This crate provides the `ds_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.
//!
//! Every macro accepts an optional leading `job: <id>,` argument which
//! prefixes the line with `[job <id>]`:
//!
//! ```
//! datestream_logging::ds_info!(job: "1f0c", "joined {}", "frontend_stream:1f0c");
//! datestream_logging::ds_warn!("socket closed");
//! ```

#[doc(hidden)]
pub use log;

#[doc(hidden)]
#[macro_export]
macro_rules! __ds_log {
    ($level:expr, job: $job:expr, $($arg:tt)+) => {{
        $crate::log::log!($level, "[job {}] {}", $job, format_args!($($arg)+));
    }};
    ($level:expr, $($arg:tt)+) => {{
        $crate::log::log!($level, $($arg)+);
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! ds_trace {
    ($($arg:tt)+) => {
        $crate::__ds_log!($crate::log::Level::Trace, $($arg)+)
    };
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! ds_debug {
    ($($arg:tt)+) => {
        $crate::__ds_log!($crate::log::Level::Debug, $($arg)+)
    };
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! ds_info {
    ($($arg:tt)+) => {
        $crate::__ds_log!($crate::log::Level::Info, $($arg)+)
    };
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! ds_warn {
    ($($arg:tt)+) => {
        $crate::__ds_log!($crate::log::Level::Warn, $($arg)+)
    };
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! ds_error {
    ($($arg:tt)+) => {
        $crate::__ds_log!($crate::log::Level::Error, $($arg)+)
    };
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

#[cfg(test)]
mod tests {
    #[test]
    fn macros_accept_plain_and_job_tagged_forms() {
        super::initialize_for_tests();
        super::initialize_for_tests();
        ds_debug!("plain {}", 1);
        ds_info!(job: "abc", "tagged {}", 2);
        ds_warn!(job: 7, "numeric job id");
        ds_trace!("trace");
        ds_error!("error {}", "text");
    }
}
