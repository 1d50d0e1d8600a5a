//! Shared test utilities for the fleet-config workspace.
//!
//! This crate lays out template trees, project directories and fleet config
//! files in a temporary directory. It is a dev-dependency only, never
//! published.
//!
//! # Modules
//!
//! - [`fleet`] — [`TestFleet`](fleet::TestFleet) builder
//! - [`git`] — real git repositories for staging tests

pub mod fleet;
pub mod git;

pub use fleet::{STANDARD_SECTIONS, TestFleet};
pub use git::{init_git_repo, staged_paths};
