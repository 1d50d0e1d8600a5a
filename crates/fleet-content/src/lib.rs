//! Format-preserving TOML documents for fleet-config
//!
//! Provides the structured [`Document`] model over `toml_edit`, validated
//! [`KeyPath`]s, a formatting-only normalizer and the unified diff reporter.

pub mod diff;
pub mod document;
pub mod error;
pub mod normalize;
pub mod path;

pub use diff::{DiffReport, DiffStatus, unified_diff};
pub use document::{Document, LineEnding};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use path::KeyPath;
