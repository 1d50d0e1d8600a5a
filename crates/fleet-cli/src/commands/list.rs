//! `--list-configs` and `--list-projects`

use colored::Colorize;
use fleet_core::{ConfigType, FleetConfig};

/// Print every config type with its description.
pub fn run_list_configs() {
    println!("{}", "Available config types:".bold());
    println!();
    for config_type in ConfigType::ALL {
        println!(
            "  {:<16} {}",
            config_type.name().cyan(),
            config_type.description()
        );
    }
    println!();
    println!("Total: {} config types", ConfigType::ALL.len());
}

/// Print each project's path and effective config types.
pub fn run_list_projects(config: &FleetConfig) {
    if config.projects.is_empty() {
        println!("{}", "No projects configured.".dimmed());
        return;
    }

    for project in &config.projects {
        let path = config.resolve_path(&project.path);
        println!("{} {}", project.name.bold(), path.as_str().dimmed());
        match config.effective(project) {
            Ok(effective) => {
                let names: Vec<&str> = effective.configs.iter().map(|c| c.name()).collect();
                if names.is_empty() {
                    println!("    configs: {}", "(none)".dimmed());
                } else {
                    println!("    configs: {}", names.join(", "));
                }
            }
            Err(e) => println!("    {}", e.to_string().red()),
        }
    }
}
