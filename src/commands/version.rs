//! Version command
//!
//! Print the version declared in the package's `__init__.py`

use anyhow::Result;
use sailbuild::Config;
use std::path::Path;

/// Print the package version.
///
/// The package defaults to `[package] name` from the config.
pub(crate) fn run(project: &Path, config_path: Option<&Path>, package: Option<&str>) -> Result<()> {
    let config = Config::load_with_options(project, config_path)?;
    let package = package.unwrap_or(&config.package.name);

    sailbuild::debug!(
        "Reading version from {}",
        sailbuild::version::version_file(project, package).display()
    );
    let version = sailbuild::read_package_version(project, package)?;

    println!("{version}");
    Ok(())
}
