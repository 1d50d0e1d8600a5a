//! Per-config-type handlers and the result they report
//!
//! Every (project, config type) pair goes through [`apply`], which picks the
//! handler for the type's [`Strategy`], holds the target path's lock for the
//! whole read-modify-write and turns any error into an [`ApplyResult`].

mod config_type;
mod dependency_pins;
mod gitlab_ci;
mod pyproject;
mod render;
mod template_copy;

pub use config_type::{ConfigType, Strategy, TemplateFormat};
pub use gitlab_ci::{YamlEdit, YamlPath};
pub use render::{RenderContext, render};

use std::fmt;

use fleet_content::{DiffReport, DiffStatus};
use fleet_fs::{NormalizedPath, PathLocks, io};

use crate::Result;
use crate::applier::ApplyOptions;
use crate::config::EffectiveConfig;

/// What happened to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyStatus {
    Created,
    Updated,
    Unchanged,
    Skipped,
    Error,
}

impl ApplyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }

    /// Created or updated.
    pub fn is_change(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DiffStatus> for ApplyStatus {
    fn from(status: DiffStatus) -> Self {
        match status {
            DiffStatus::Created => Self::Created,
            DiffStatus::Updated => Self::Updated,
            DiffStatus::Unchanged => Self::Unchanged,
        }
    }
}

/// Terminal state of a handler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was written.
    Applied,
    /// Nothing was written: dry run, no change, or nothing to do.
    Skipped,
    Failed,
}

/// Result of applying one config type to one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub status: ApplyStatus,
    pub outcome: Outcome,
    pub message: Option<String>,
    /// Unified diff, carried in dry runs and when diffs were requested.
    pub diff: Option<String>,
    /// Backup written before the file was replaced.
    pub backup: Option<NormalizedPath>,
}

impl ApplyResult {
    fn new(status: ApplyStatus, outcome: Outcome) -> Self {
        Self {
            status,
            outcome,
            message: None,
            diff: None,
            backup: None,
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self::new(ApplyStatus::Skipped, Outcome::Skipped).with_message(message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ApplyStatus::Error, Outcome::Failed).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ApplyStatus::Error
    }
}

/// Everything a handler needs besides the config type.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext<'a> {
    pub project: &'a EffectiveConfig,
    pub template_dir: &'a NormalizedPath,
    pub options: &'a ApplyOptions,
    pub locks: &'a PathLocks,
}

impl ApplyContext<'_> {
    /// Template for `config_type`, honoring the project's override.
    fn template_for(&self, config_type: ConfigType) -> Option<NormalizedPath> {
        if let Some(path) = self.project.template_overrides.get(&config_type) {
            return Some(path.clone());
        }
        match config_type {
            ConfigType::License => Some(
                self.template_dir
                    .join("license")
                    .join(&self.project.license_type),
            ),
            other => other
                .template_path()
                .map(|relative| self.template_dir.join(&relative)),
        }
    }
}

/// Apply one config type to the project in `ctx`. Never fails: errors are
/// reported on the result.
pub fn apply(config_type: ConfigType, ctx: &ApplyContext<'_>) -> ApplyResult {
    let target = ctx.project.path.join(config_type.output_file());
    let _span = tracing::debug_span!(
        "apply",
        project = %ctx.project.name,
        config = %config_type
    )
    .entered();

    let result = ctx.locks.lock(&target).run(|| match config_type.strategy() {
        Strategy::FileCopy(format) => template_copy::apply(config_type, format, &target, ctx),
        Strategy::StructuralMerge => pyproject::apply(&target, ctx),
        Strategy::DependencyRewrite => dependency_pins::apply(&target, ctx),
        Strategy::LineEdit => gitlab_ci::apply(&target, ctx),
    });

    match result {
        Ok(result) => {
            if result.status == ApplyStatus::Skipped {
                tracing::warn!(
                    project = %ctx.project.name,
                    config = %config_type,
                    reason = result.message.as_deref().unwrap_or(""),
                    "config skipped"
                );
            }
            result
        }
        Err(e) => {
            tracing::warn!(
                project = %ctx.project.name,
                config = %config_type,
                error = %e,
                "config failed"
            );
            ApplyResult::failed(e.to_string())
        }
    }
}

/// Compare `content` with the current file and write it when allowed.
///
/// Shared tail of every handler: unchanged content and dry runs are skipped,
/// otherwise the original is optionally backed up and the file is replaced
/// atomically.
fn commit(
    target: &NormalizedPath,
    original: Option<&str>,
    content: &str,
    ctx: &ApplyContext<'_>,
) -> Result<ApplyResult> {
    let report = DiffReport::compute(original, content, target.file_name().unwrap_or(""));
    commit_report(target, report, original.is_some(), content, ctx)
}

fn commit_report(
    target: &NormalizedPath,
    report: DiffReport,
    had_original: bool,
    content: &str,
    ctx: &ApplyContext<'_>,
) -> Result<ApplyResult> {
    let status = ApplyStatus::from(report.status);
    if !report.is_changed() {
        return Ok(ApplyResult::new(status, Outcome::Skipped));
    }

    let options = ctx.options;
    let diff = report.diff.filter(|_| options.show_diff || options.dry_run);
    if options.dry_run {
        return Ok(ApplyResult {
            diff,
            ..ApplyResult::new(status, Outcome::Skipped)
        });
    }

    let backup = if options.backup && had_original {
        io::backup_file(target)?
    } else {
        None
    };
    io::write_text(target, content)?;
    tracing::info!(path = %target, status = %status, "applied config");

    Ok(ApplyResult {
        diff,
        backup,
        ..ApplyResult::new(status, Outcome::Applied)
    })
}

/// Read the template file, or fail with `TemplateNotFound`.
fn read_template(path: &NormalizedPath) -> Result<String> {
    if !path.is_file() {
        return Err(crate::Error::TemplateNotFound {
            path: path.to_native(),
        });
    }
    Ok(io::read_text(path)?)
}
