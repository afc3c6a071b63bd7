//! Configuration file management
//!
//! Reads `sailbuild.toml` from the project root, falling back to the user
//! config at `~/.config/sailbuild/config.toml`. Missing keys take the
//! defaults of the saildb package.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name, looked up in the project root
pub const PROJECT_CONFIG_FILE: &str = "sailbuild.toml";

/// Application configuration loaded from TOML files
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Package metadata
    pub package: PackageConfig,

    /// Extension build settings
    pub build: BuildConfig,
}

/// `[package]` table
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackageConfig {
    /// Python package name; its `__init__.py` carries the version
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub license: Option<String>,
    pub keywords: Vec<String>,
    /// Long description source, relative to the project root
    pub readme: PathBuf,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: "saildb".to_string(),
            url: None,
            description: None,
            author: None,
            author_email: None,
            license: None,
            keywords: Vec::new(),
            readme: PathBuf::from("README.md"),
        }
    }
}

/// `[build]` table
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Build tool executable
    pub tool: String,
    /// Extension targets, built in this order
    pub targets: Vec<String>,
    /// Staging directory, relative to the project root
    pub build_temp: PathBuf,
    /// Package tree root, relative to the project root
    pub package_root: PathBuf,
    /// Linker search directories
    pub library_dirs: Vec<PathBuf>,
    /// Override for the native module suffix (`.so`, `.pyd`)
    pub artifact_suffix: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tool: crate::extensions::DEFAULT_BUILD_TOOL.to_string(),
            targets: vec!["//saildb:_core".to_string()],
            build_temp: PathBuf::from("build").join("temp"),
            package_root: PathBuf::from("."),
            library_dirs: Vec::new(),
            artifact_suffix: None,
        }
    }
}

impl Config {
    /// Load configuration with custom options.
    ///
    /// # Arguments
    /// * `project_root` - Directory searched for `sailbuild.toml`
    /// * `custom_path` - Explicit config file (overrides the search)
    ///
    /// An explicit file that is missing or invalid is an error. A project
    /// or user config that exists but fails to parse is also an error; only
    /// absent files fall through to the next location.
    pub fn load_with_options(project_root: &Path, custom_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = custom_path {
            return Self::load_from(path);
        }

        let project_config = project_root.join(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            return Self::load_from(&project_config);
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }

    fn user_config_dir() -> Option<PathBuf> {
        // Check XDG_CONFIG_HOME first
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("sailbuild"));
        }

        // Fall back to ~/.config/sailbuild
        dirs::home_dir().map(|home| home.join(".config").join("sailbuild"))
    }
}
