//! Filesystem access for fleet-config
//!
//! Provides normalized paths, atomic writes, `.bak` backups, a format-agnostic
//! config loader, and an in-process lock registry keyed by target path.

pub mod config;
pub mod error;
pub mod io;
pub mod lock;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use lock::PathLocks;
pub use path::{NormalizedPath, expand_user};
