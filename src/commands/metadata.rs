//! Metadata command
//!
//! Print the package metadata a packaging front end needs

use anyhow::{Context, Result};
use sailbuild::{Config, PackageMetadata};
use std::path::Path;

pub(crate) fn run(project: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load_with_options(project, config_path)?;
    let metadata = PackageMetadata::collect(&config, project)?;

    if json {
        let out = serde_json::to_string_pretty(&metadata)
            .context("Failed to serialize package metadata")?;
        println!("{out}");
    } else {
        for line in metadata.summary_lines() {
            println!("{line}");
        }
    }

    Ok(())
}
