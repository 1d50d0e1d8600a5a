//! Core layer of fleet-config
//!
//! This crate turns a fleet config and a template tree into per-project
//! configuration files:
//!
//! - **Merge engine**: structural merge of shared `pyproject.toml` sections
//!   into a project's own file, with preserved paths and a dev-dependency union
//! - **Handlers**: one per [`ConfigType`], dispatching to file-copy,
//!   structural-merge or dependency-rewrite
//! - **Configuration**: loading, defaults-to-project resolution and validation
//! - **Batch applier**: every selected pair, in parallel, reported in order
//! - **Git staging**: optional `git add` of the files a run wrote
//!
//! # Architecture
//!
//! ```text
//!              fleet-cli
//!                  |
//!             fleet-core
//!                  |
//!         +--------+--------+
//!         |                 |
//!     fleet-fs       fleet-content
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fleet_core::{ApplyFilters, ApplyOptions, FleetConfig, NullProgress, apply_configs};
//! use fleet_fs::NormalizedPath;
//!
//! fn example() -> fleet_core::Result<()> {
//!     let config = FleetConfig::load(&NormalizedPath::new("config.yaml"))?;
//!     fleet_core::validate(&config)?;
//!     let summary = apply_configs(
//!         &config,
//!         &ApplyOptions::default(),
//!         &ApplyFilters::default(),
//!         &NullProgress,
//!     )?;
//!     println!("{} created, {} updated", summary.created, summary.updated);
//!     Ok(())
//! }
//! ```

pub mod applier;
pub mod config;
pub mod error;
pub mod git;
pub mod handlers;
pub mod merge;
pub mod progress;

pub use applier::{
    ApplyFilters, ApplyOptions, ApplySummary, Change, ConfigOutcome, ProjectReport, apply_configs,
};
pub use config::{
    EffectiveConfig, FleetConfig, ProjectConfig, resolve, validate, validate_structure,
};
pub use error::{Error, Result};
pub use handlers::{ApplyContext, ApplyResult, ApplyStatus, ConfigType, Outcome, apply};
pub use merge::{MergeError, MergePolicy, MergeResult, merge};
pub use progress::{NullProgress, ProgressSink};
