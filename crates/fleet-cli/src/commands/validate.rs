//! Config loading and the `--validate` command

use std::path::Path;

use colored::Colorize;
use fleet_core::{FleetConfig, validate, validate_structure};
use fleet_fs::NormalizedPath;

use crate::error::Result;

/// Load the fleet config and check its project list; every command but
/// `--list-configs` starts here.
///
/// Problems confined to one project are left to the apply run, which
/// reports them against that project only.
pub fn load_config(path: &Path) -> Result<FleetConfig> {
    let config = FleetConfig::load(&NormalizedPath::new(path))?;
    validate_structure(&config)?;
    Ok(config)
}

/// Fully validate a loaded config, every project included, and report it.
pub fn run_validate(path: &Path, config: &FleetConfig) -> Result<()> {
    validate(config)?;
    println!(
        "{} {} is valid ({} projects, templates in {})",
        "OK".green().bold(),
        path.display(),
        config.projects.len(),
        config.template_dir().as_str().cyan()
    );
    Ok(())
}
