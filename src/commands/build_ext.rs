//! Build extensions command
//!
//! Compile every configured extension target and install the artifacts

use anyhow::{Context, Result};
use sailbuild::{
    BuildError, CliOverrides, Config, EnvOverrides, ExtensionBuilder, SystemRunner, resolve_build,
};
use std::path::Path;

pub(crate) fn run(
    project: &Path,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    quiet: bool,
) -> Result<()> {
    // The build tool runs inside the project, so every path handed to it
    // must already be absolute
    let project = std::path::absolute(project)
        .with_context(|| format!("Failed to resolve project directory {}", project.display()))?;
    let config = Config::load_with_options(&project, config_path)?;

    // Every target is validated before anything touches the filesystem
    let resolved = resolve_build(&config, &project, &EnvOverrides::from_env(), overrides)
        .context("Invalid extension target configuration")?;

    sailbuild::debug!(
        "Building {} target(s) in {} mode",
        resolved.targets.len(),
        resolved.options.mode.as_flag_value()
    );

    let builder = ExtensionBuilder::new(SystemRunner, resolved.options).with_progress(!quiet);

    let mut reports = Vec::with_capacity(resolved.targets.len());
    for target in &resolved.targets {
        let report = match builder.build(target) {
            Ok(report) => report,
            Err(e) => {
                // Debug mode already echoed the tool output line by line
                if let BuildError::ExternalBuildFailed { output, .. } = &e
                    && !output.is_empty()
                    && !sailbuild::is_debug_enabled()
                {
                    eprintln!("{output}");
                }
                return Err(e.into());
            }
        };
        if !quiet {
            println!(
                "  Installed {} -> {} ({:.1}s)",
                target.module_name(),
                report.installed.display(),
                report.duration.as_secs_f64()
            );
        }
        reports.push(report);
    }

    if !quiet {
        let (installed, duration) = ExtensionBuilder::<SystemRunner>::summarize(&reports);
        println!(
            "Built {installed} extension(s) in {:.1}s",
            duration.as_secs_f64()
        );
    }

    Ok(())
}
