//! Error types for fleet-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from fleet-core
    #[error(transparent)]
    Core(#[from] fleet_core::Error),

    /// Error from fleet-fs
    #[error(transparent)]
    Fs(#[from] fleet_fs::Error),

    /// Logging could not be set up
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
