//! Package version discovery.
//!
//! Reads `__version__ = '...'` out of a package's `__init__.py` without
//! importing it. Only the first line that starts with the marker counts.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Line prefix that declares the package version.
pub const VERSION_MARKER: &str = "__version__";

/// Errors raised while reading a package version
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} of package {package} does not define __version__", path.display())]
    MissingVersionDeclaration { package: String, path: PathBuf },

    #[error("Failed to parse version from {}: {message}", path.display())]
    MalformedVersionDeclaration { path: PathBuf, message: String },
}

/// Path of the file that carries the version declaration for `package`.
#[must_use]
pub fn version_file(pkg_root: &Path, package: &str) -> PathBuf {
    pkg_root.join(package).join("__init__.py")
}

/// Read the version of `package` located under `pkg_root`.
///
/// # Example
///
/// ```no_run
/// use sailbuild::version::read_package_version;
/// use std::path::Path;
///
/// let version = read_package_version(Path::new("."), "saildb")?;
/// println!("saildb {version}");
/// # Ok::<(), sailbuild::version::VersionError>(())
/// ```
pub fn read_package_version(pkg_root: &Path, package: &str) -> Result<String, VersionError> {
    let path = version_file(pkg_root, package);
    let contents = fs::read_to_string(&path).map_err(|source| VersionError::Read {
        path: path.clone(),
        source,
    })?;

    let Some(line) = contents
        .lines()
        .find(|line| line.starts_with(VERSION_MARKER))
    else {
        return Err(VersionError::MissingVersionDeclaration {
            package: package.to_string(),
            path,
        });
    };

    parse_declaration(line).map_err(|message| VersionError::MalformedVersionDeclaration {
        path,
        message,
    })
}

/// Extract the literal from a `name = 'value'` declaration line.
///
/// The value is the text between the first and second `=`, with whitespace
/// and then quote characters stripped from both ends.
pub fn parse_declaration(line: &str) -> Result<String, String> {
    let Some(raw) = line.split('=').nth(1) else {
        return Err(format!("expected `=` in declaration: {}", line.trim()));
    };

    let value = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    if value.is_empty() {
        return Err(format!("empty value in declaration: {}", line.trim()));
    }

    Ok(value.to_string())
}
