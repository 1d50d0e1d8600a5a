//! Error types for fleet-content

/// Result type for fleet-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fleet-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Cannot set {path}: {reason}")]
    PathSetFailed { path: String, reason: String },

    #[error("Invalid key path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
