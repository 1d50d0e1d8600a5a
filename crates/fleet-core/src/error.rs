//! Error types for fleet-core

use std::path::PathBuf;

use crate::merge::MergeError;

/// Result type for fleet-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fleet-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid fleet configuration or filter, raised before any merge
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A malformed target or template document
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: fleet_content::Error,
    },

    /// Structural incompatibility between template and target
    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    /// Template file for a config type is missing
    #[error("Template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// A template placeholder that cannot be filled
    #[error("Template {path}: {message}")]
    Template { path: PathBuf, message: String },

    /// Rendered content does not parse as its declared format
    #[error("Rendered {file} is not valid {format}: {message}")]
    Validation {
        file: String,
        format: String,
        message: String,
    },

    /// Project directory does not exist
    #[error("Project directory not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// Staging written files failed
    #[error("git add failed in {path}: {message}")]
    Git { path: PathBuf, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from fleet-fs
    #[error(transparent)]
    Fs(#[from] fleet_fs::Error),

    /// Document error from fleet-content
    #[error(transparent)]
    Content(#[from] fleet_content::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn parse(file: impl Into<String>, source: fleet_content::Error) -> Self {
        Self::Parse {
            file: file.into(),
            source,
        }
    }
}
