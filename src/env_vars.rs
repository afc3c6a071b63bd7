//! Environment variable handling.
//!
//! Environment overrides sit between CLI flags and the config file in
//! priority order.

use std::env;
use std::path::PathBuf;

// Helper for boolean environment variables that accept "1", "true", "yes"
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| {
        let s = s.to_lowercase();
        s == "1" || s == "true" || s == "yes"
    })
}

/// Whether `SAILBUILD_DEBUG` asks for debug logging.
pub fn debug_enabled() -> bool {
    is_enabled("SAILBUILD_DEBUG")
}

/// Get the build tool executable from `BAZEL` (e.g. `/opt/bazel/bin/bazel`).
pub fn build_tool() -> Option<String> {
    env::var("BAZEL").ok().filter(|s| !s.is_empty())
}

/// Get the staging directory from `SAILBUILD_BUILD_TEMP`.
pub fn build_temp() -> Option<PathBuf> {
    env::var("SAILBUILD_BUILD_TEMP")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Get extra library search directories (colon/space-separated list).
pub fn library_dirs() -> Vec<PathBuf> {
    env::var("SAILBUILD_LIBRARY_DIRS")
        .map(|s| split_list(&s))
        .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<PathBuf> {
    value
        .split([':', ' '])
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
