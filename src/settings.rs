//! Build settings resolution
//!
//! Combines CLI flags, environment overrides and the config file into the
//! [`BuildOptions`] and target list for one bridge run.
//!
//! Priority for single values: CLI, then environment, then config. Library
//! directories are collected from all three (config, env, CLI order).

use crate::config::Config;
use crate::env_vars;
use crate::extensions::{BuildOptions, CompilationMode, ExtensionTarget, TargetError, parse_targets};
use crate::platform;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Values taken from environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub tool: Option<String>,
    pub build_temp: Option<PathBuf>,
    pub library_dirs: Vec<PathBuf>,
}

impl EnvOverrides {
    /// Read `BAZEL`, `SAILBUILD_BUILD_TEMP` and `SAILBUILD_LIBRARY_DIRS`.
    pub fn from_env() -> Self {
        Self {
            tool: env_vars::build_tool(),
            build_temp: env_vars::build_temp(),
            library_dirs: env_vars::library_dirs(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub debug: bool,
    pub tool: Option<String>,
    pub build_temp: Option<PathBuf>,
    pub package_root: Option<PathBuf>,
    pub library_dirs: Vec<PathBuf>,
    pub targets: Vec<String>,
}

/// Everything needed to run the bridge
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    pub targets: Vec<ExtensionTarget>,
    pub options: BuildOptions,
}

/// Resolve the build for the project at `project_root`.
///
/// Targets are validated here, so an invalid identifier is reported before
/// any directory is created or process started. Relative directories are
/// anchored at `project_root`, which is also the build tool's workspace.
/// `project_root` should be absolute: the tool resolves the paths it is
/// given from inside the workspace, while the bridge resolves them from the
/// current directory.
pub fn resolve_build(
    config: &Config,
    project_root: &Path,
    env: &EnvOverrides,
    cli: &CliOverrides,
) -> Result<ResolvedBuild, TargetError> {
    let targets = if cli.targets.is_empty() {
        parse_targets(&config.build.targets)?
    } else {
        parse_targets(&cli.targets)?
    };

    let tool = cli
        .tool
        .clone()
        .or_else(|| env.tool.clone())
        .unwrap_or_else(|| config.build.tool.clone());

    let build_temp = cli
        .build_temp
        .clone()
        .or_else(|| env.build_temp.clone())
        .unwrap_or_else(|| config.build.build_temp.clone());

    let package_root = cli
        .package_root
        .clone()
        .unwrap_or_else(|| config.build.package_root.clone());

    let library_dirs = config
        .build
        .library_dirs
        .iter()
        .chain(&env.library_dirs)
        .chain(&cli.library_dirs)
        .map(|dir| project_root.join(dir))
        .collect();

    let suffix = config.build.artifact_suffix.as_deref().map_or_else(
        || platform::extension_suffix().to_string(),
        platform::normalize_suffix,
    );

    let options = BuildOptions {
        tool: OsString::from(tool),
        workspace: Some(project_root.to_path_buf()),
        build_temp: project_root.join(build_temp),
        package_root: project_root.join(package_root),
        mode: CompilationMode::from_debug(cli.debug),
        library_dirs,
        suffix,
    };

    Ok(ResolvedBuild { targets, options })
}
