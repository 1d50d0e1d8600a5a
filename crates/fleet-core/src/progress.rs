//! Progress reporting seam between the batch applier and its caller

use crate::handlers::{ApplyResult, ConfigType};

/// Receives per-project, per-config progress from the batch applier.
///
/// Implementations must be shareable across worker threads.
pub trait ProgressSink: Send + Sync {
    /// A project is about to be processed.
    fn project_started(&self, _project: &str) {}

    /// One (project, config type) pair finished.
    fn config_finished(&self, _project: &str, _config: ConfigType, _result: &ApplyResult) {}

    /// A project finished; `index` counts completed projects from 1.
    fn project_finished(&self, _project: &str, _index: usize, _total: usize) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}
