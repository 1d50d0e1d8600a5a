//! The default command: apply configs across the fleet

use colored::Colorize;
use fleet_core::{ApplyFilters, ApplyOptions, FleetConfig, NullProgress, ProgressSink, apply_configs};

use super::output::{ConsoleProgress, print_summary};
use crate::cli::Cli;
use crate::error::Result;

/// Run the batch and print its summary.
///
/// Returns `false` when any (project, config type) pair failed.
pub fn run_apply(config: &FleetConfig, cli: &Cli) -> Result<bool> {
    let options = ApplyOptions {
        dry_run: !cli.apply,
        backup: cli.backup,
        show_diff: cli.diff,
        jobs: usize::from(cli.jobs),
        git_add: cli.git_add,
    };
    let filters = ApplyFilters {
        projects: cli.projects.clone(),
        config_types: cli.configs.clone(),
    };
    let progress: &dyn ProgressSink = if cli.verbose {
        &ConsoleProgress
    } else {
        &NullProgress
    };

    if options.dry_run {
        println!(
            "{} no files will be written (use {} to write changes)",
            "Dry run:".yellow().bold(),
            "--apply".cyan()
        );
        println!();
    }

    let summary = apply_configs(config, &options, &filters, progress)?;
    print_summary(&summary, options.show_diff);

    if summary.has_errors() {
        eprintln!();
        for message in &summary.error_messages {
            eprintln!("{}: {}", "error".red().bold(), message);
        }
    }
    Ok(!summary.has_errors())
}
