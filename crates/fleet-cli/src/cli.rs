//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// fleet - Apply shared configuration to a fleet of Python projects
///
/// Runs as a dry run unless --apply is given.
///
/// Examples:
///   fleet                         # Preview changes for every project
///   fleet --apply --backup        # Write changes, keeping .bak copies
///   fleet --apply --git-add       # Write changes and stage them
///   fleet -p api -t pyproject -d  # Preview one config type, with diffs
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fleet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Fleet config file (YAML, TOML or JSON)
    #[arg(short = 'c', long, env = "FLEET_CONFIG", default_value = "config.yaml")]
    pub config_file: PathBuf,

    /// Write changes instead of previewing them
    #[arg(short, long)]
    pub apply: bool,

    /// Only process these projects
    #[arg(short, long = "project", value_name = "NAME")]
    pub projects: Vec<String>,

    /// Only apply these config types
    #[arg(short = 't', long = "config", value_name = "TYPE")]
    pub configs: Vec<String>,

    /// Show a unified diff for every change
    #[arg(short, long)]
    pub diff: bool,

    /// Copy files to <file>.bak before replacing them
    #[arg(short, long)]
    pub backup: bool,

    /// Stage created and updated files with git
    #[arg(long, requires = "apply")]
    pub git_add: bool,

    /// Number of projects processed in parallel
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate the config file and exit
    #[arg(long, conflicts_with_all = ["list_projects", "list_configs"])]
    pub validate: bool,

    /// List projects with their effective config types
    #[arg(long, conflicts_with = "list_configs")]
    pub list_projects: bool,

    /// List every config type
    #[arg(long)]
    pub list_configs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_are_a_sequential_dry_run() {
        let cli = Cli::try_parse_from(["fleet"]).unwrap();
        assert!(!cli.apply);
        assert_eq!(cli.jobs, 1);
        assert_eq!(cli.config_file, PathBuf::from("config.yaml"));
    }

    #[test]
    fn repeated_filters_accumulate() {
        let cli = Cli::try_parse_from([
            "fleet", "-p", "api", "--project", "web", "-t", "ruff", "-a", "-j", "4",
        ])
        .unwrap();
        assert_eq!(cli.projects, vec!["api", "web"]);
        assert_eq!(cli.configs, vec!["ruff"]);
        assert!(cli.apply);
        assert_eq!(cli.jobs, 4);
    }

    #[test]
    fn git_add_needs_apply() {
        assert!(Cli::try_parse_from(["fleet", "--git-add"]).is_err());
        let cli = Cli::try_parse_from(["fleet", "--apply", "--git-add"]).unwrap();
        assert!(cli.git_add);
    }

    #[test]
    fn zero_jobs_rejected() {
        assert!(Cli::try_parse_from(["fleet", "-j", "0"]).is_err());
    }
}
