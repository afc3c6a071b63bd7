//! Extension target descriptors
//!
//! A target is a Bazel label of the form `//<path>:<name>`. The path locates
//! the package directory in both the source tree and `bazel-bin/`, and the
//! name becomes the file stem of the compiled module.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const LABEL_SEPARATOR: char = ':';
const WORKSPACE_ROOT: &str = "//";

/// Errors raised while parsing a target identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("Invalid target identifier {target:?}: {reason}")]
    InvalidTargetIdentifier { target: String, reason: String },
}

/// One buildable native extension
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionTarget {
    qualified_target: String,
    relative_path: String,
    target_name: String,
}

impl ExtensionTarget {
    /// Parse and validate a target identifier.
    ///
    /// A leading `//` is allowed and dropped from the relative path.
    ///
    /// ```
    /// use sailbuild::extensions::ExtensionTarget;
    ///
    /// let target = ExtensionTarget::parse("//saildb:_core").unwrap();
    /// assert_eq!(target.relative_path(), "saildb");
    /// assert_eq!(target.target_name(), "_core");
    /// ```
    pub fn parse(qualified_target: &str) -> Result<Self, TargetError> {
        let invalid = |reason: &str| TargetError::InvalidTargetIdentifier {
            target: qualified_target.to_string(),
            reason: reason.to_string(),
        };

        let label = qualified_target
            .strip_prefix(WORKSPACE_ROOT)
            .unwrap_or(qualified_target);

        let parts: Vec<&str> = label.split(LABEL_SEPARATOR).collect();
        let [relative_path, target_name] = parts.as_slice() else {
            return Err(invalid(&format!(
                "expected exactly one `{LABEL_SEPARATOR}` separating path and name, found {}",
                parts.len().saturating_sub(1)
            )));
        };

        let relative_path = relative_path.trim_end_matches('/');
        if relative_path.is_empty() {
            return Err(invalid("package path is empty"));
        }
        if relative_path.split('/').any(|part| matches!(part, "." | "..")) {
            return Err(invalid("package path must not contain `.` or `..`"));
        }
        if target_name.is_empty() {
            return Err(invalid("target name is empty"));
        }
        if target_name.contains('/') {
            return Err(invalid("target name must not contain `/`"));
        }

        Ok(Self {
            qualified_target: qualified_target.to_string(),
            relative_path: relative_path.to_string(),
            target_name: (*target_name).to_string(),
        })
    }

    /// Identifier exactly as declared
    #[must_use]
    pub fn qualified_target(&self) -> &str {
        &self.qualified_target
    }

    /// Package path within the workspace, `/`-separated
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Short target name
    #[must_use]
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Module path inside the package tree, without suffix (`saildb/_core`).
    ///
    /// Components are joined with the host path separator.
    #[must_use]
    pub fn extension_module_name(&self) -> PathBuf {
        let mut path: PathBuf = self.relative_path.split('/').collect();
        path.push(&self.target_name);
        path
    }

    /// Dotted module name (`saildb._core`).
    #[must_use]
    pub fn module_name(&self) -> String {
        format!("{}.{}", self.relative_path.replace('/', "."), self.target_name)
    }

    /// Artifact location relative to the staging directory.
    #[must_use]
    pub fn artifact_relative_path(&self, suffix: &str) -> PathBuf {
        let mut path = PathBuf::from("bazel-bin");
        path.extend(self.relative_path.split('/'));
        path.push(format!("{}{suffix}", self.target_name));
        path
    }

    /// Install location relative to the package root.
    #[must_use]
    pub fn install_relative_path(&self, suffix: &str) -> PathBuf {
        let mut path = self.extension_module_name();
        path.set_file_name(format!("{}{suffix}", self.target_name));
        path
    }
}

impl FromStr for ExtensionTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExtensionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_target)
    }
}

/// Parse every identifier, failing on the first invalid one.
pub fn parse_targets<S: AsRef<str>>(identifiers: &[S]) -> Result<Vec<ExtensionTarget>, TargetError> {
    identifiers
        .iter()
        .map(|id| ExtensionTarget::parse(id.as_ref()))
        .collect()
}
