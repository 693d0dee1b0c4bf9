#![deny(missing_docs)]
//! Shared logging utilities for the QuickPrint workspace.
//!
//! This crate provides the `qp_*` logging macros used across the codebase,
//! a helper for summarising large Base64 payloads in log lines, and a minimal
//! test initializer for the global logger.

/// Number of leading payload characters kept by [`payload_summary`].
pub const PAYLOAD_PREFIX_CHARS: usize = 16;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! qp_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! qp_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! qp_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! qp_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! qp_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Summarises a potentially huge payload (Base64 data, print URL) for logging.
///
/// Print payloads run to hundreds of kilobytes; log lines only carry the
/// length and a short prefix.
pub fn payload_summary(payload: &str) -> String {
    let prefix: String = payload.chars().take(PAYLOAD_PREFIX_CHARS).collect();
    if prefix.len() == payload.len() {
        format!("len={} {:?}", payload.len(), payload)
    } else {
        format!("len={} {:?}...", payload.len(), prefix)
    }
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
    use super::payload_summary;

    #[test]
    fn short_payload_is_shown_whole() {
        assert_eq!(payload_summary("QUJD"), "len=4 \"QUJD\"");
    }

    #[test]
    fn long_payload_is_truncated() {
        let payload = "A".repeat(1000);
        let summary = payload_summary(&payload);
        assert!(summary.starts_with("len=1000 "));
        assert!(summary.ends_with("..."));
        assert!(summary.len() < 40);
    }
}
