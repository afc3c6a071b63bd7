//! Package metadata collection.
//!
//! Gathers what a packaging front end needs to describe the distribution:
//! the configured `[package]` fields, the version from `__init__.py` and the
//! README as long description.

use crate::config::Config;
use crate::version::read_package_version;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Content type reported for the long description
pub const LONG_DESCRIPTION_CONTENT_TYPE: &str = "text/markdown";

/// Distribution metadata for one package
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub license: Option<String>,
    pub keywords: Vec<String>,
    pub long_description: String,
    pub long_description_content_type: String,
    /// Dotted names of the native extension modules
    pub ext_modules: Vec<String>,
}

impl PackageMetadata {
    /// Collect metadata for the project rooted at `project_root`.
    ///
    /// Fails if the version cannot be read, the README is missing or a
    /// configured target is invalid.
    pub fn collect(config: &Config, project_root: &Path) -> Result<Self> {
        let pkg = &config.package;
        let version = read_package_version(project_root, &pkg.name)?;

        let readme = project_root.join(&pkg.readme);
        let long_description = fs::read_to_string(&readme)
            .with_context(|| format!("Failed to read long description from {}", readme.display()))?;

        let ext_modules = crate::extensions::parse_targets(&config.build.targets)?
            .iter()
            .map(crate::extensions::ExtensionTarget::module_name)
            .collect();

        Ok(Self {
            name: pkg.name.clone(),
            version,
            url: pkg.url.clone(),
            description: pkg.description.clone(),
            author: pkg.author.clone(),
            author_email: pkg.author_email.clone(),
            license: pkg.license.clone(),
            keywords: pkg.keywords.clone(),
            long_description,
            long_description_content_type: LONG_DESCRIPTION_CONTENT_TYPE.to_string(),
            ext_modules,
        })
    }

    /// `key: value` lines for terminal output, skipping unset fields.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Name: {}", self.name),
            format!("Version: {}", self.version),
        ];
        let optional = [
            ("Home-page", &self.url),
            ("Summary", &self.description),
            ("Author", &self.author),
            ("Author-email", &self.author_email),
            ("License", &self.license),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                lines.push(format!("{key}: {value}"));
            }
        }
        if !self.keywords.is_empty() {
            lines.push(format!("Keywords: {}", self.keywords.join(",")));
        }
        for module in &self.ext_modules {
            lines.push(format!("Extension: {module}"));
        }
        lines
    }
}
