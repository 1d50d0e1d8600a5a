//! Change classification and unified diffs

use std::fmt;

use similar::TextDiff;

/// Lines of context around each hunk.
const CONTEXT_LINES: usize = 3;

/// How a rendered file compares to what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffStatus {
    /// No file existed before.
    Created,
    /// The file exists and its content would change.
    Updated,
    /// The file is byte-identical to the rendered content.
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus the unified diff that explains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub status: DiffStatus,
    /// `None` exactly when the status is `Unchanged`.
    pub diff: Option<String>,
}

impl DiffReport {
    /// Compare the current file content (absent when the file does not exist)
    /// with the content about to be written.
    pub fn compute(original: Option<&str>, merged: &str, file_name: &str) -> Self {
        match original {
            None => Self {
                status: DiffStatus::Created,
                diff: Some(unified_diff("", merged, file_name)),
            },
            Some(original) if original == merged => Self {
                status: DiffStatus::Unchanged,
                diff: None,
            },
            Some(original) => Self {
                status: DiffStatus::Updated,
                diff: Some(unified_diff(original, merged, file_name)),
            },
        }
    }

    pub fn is_changed(&self) -> bool {
        self.status != DiffStatus::Unchanged
    }
}

/// Line-oriented unified diff with `a/<file>` and `b/<file>` headers.
pub fn unified_diff(old: &str, new: &str, file_name: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&format!("a/{file_name}"), &format!("b/{file_name}"))
        .to_string()
}
