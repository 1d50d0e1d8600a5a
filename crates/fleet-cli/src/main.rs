//! fleet CLI
//!
//! Applies shared configuration files to every project listed in a fleet
//! config.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use error::Result;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when the run finished but some pair failed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if cli.list_configs {
        commands::run_list_configs();
        return Ok(true);
    }

    let config = commands::load_config(&cli.config_file)?;

    if cli.validate {
        commands::run_validate(&cli.config_file, &config)?;
        return Ok(true);
    }
    if cli.list_projects {
        commands::run_list_projects(&config);
        return Ok(true);
    }

    commands::run_apply(&config, &cli)
}
