//! Platform detection
//!
//! Native Python extension modules use `.pyd` on Windows and `.so` on every
//! other platform.

/// Native extension suffix for the host platform, including the leading dot.
#[must_use]
pub fn extension_suffix() -> &'static str {
    suffix_for_os(std::env::consts::OS)
}

fn suffix_for_os(os: &str) -> &'static str {
    match os {
        "windows" => ".pyd",
        _ => ".so",
    }
}

/// Normalize a configured suffix so it always starts with a dot.
#[must_use]
pub fn normalize_suffix(suffix: &str) -> String {
    if suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{suffix}")
    }
}
