//! Debug logging utilities
//!
//! Debug output is enabled by the global `--verbose` flag or by setting
//! `SAILBUILD_DEBUG`. Messages go to stderr prefixed with `[DEBUG]` so they
//! never mix with command output on stdout.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize debug mode from the command-line flag.
///
/// The `SAILBUILD_DEBUG` environment variable turns debug mode on even when
/// the flag is absent. Only the first call has any effect.
pub fn init_debug(enabled: bool) {
    let _ = DEBUG_ENABLED.set(enabled || crate::env_vars::debug_enabled());
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Print captured tool output line by line at debug level.
pub fn debug_output(label: &str, output: &str) {
    if !is_debug_enabled() {
        return;
    }
    for line in output.lines() {
        eprintln!("[DEBUG] {label}| {line}");
    }
}

/// Macro for convenient debug logging
///
/// Usage: `debug!("message with {}", variable)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}
