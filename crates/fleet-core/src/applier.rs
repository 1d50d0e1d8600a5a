//! Batch applier: every selected config type for every selected project
//!
//! Projects are processed independently, optionally on several scoped worker
//! threads. Results are reported in configuration order whatever order the
//! workers finish in. A failing project or config type never stops the others.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use fleet_fs::{NormalizedPath, PathLocks};

use crate::config::{
    EffectiveConfig, FleetConfig, ProjectConfig, closest_names, unknown_name_message,
};
use crate::git;
use crate::handlers::{self, ApplyContext, ApplyResult, ApplyStatus, ConfigType, Outcome};
use crate::progress::ProgressSink;
use crate::{Error, Result};

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// If true, compute results and diffs without writing anything.
    pub dry_run: bool,
    /// Copy an existing file to `<file>.bak` before replacing it.
    pub backup: bool,
    /// Carry diff text on every changed result.
    pub show_diff: bool,
    /// Number of worker threads; 1 runs sequentially.
    pub jobs: usize,
    /// Stage created and updated files in the project's git repository.
    pub git_add: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            backup: false,
            show_diff: false,
            jobs: 1,
            git_add: false,
        }
    }
}

/// Restricts a batch run to some projects and config types.
///
/// Empty lists select everything.
#[derive(Debug, Clone, Default)]
pub struct ApplyFilters {
    pub projects: Vec<String>,
    pub config_types: Vec<String>,
}

/// Result of one config type within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOutcome {
    pub config_type: ConfigType,
    pub result: ApplyResult,
}

/// Everything that happened to one project.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    pub name: String,
    pub path: NormalizedPath,
    pub results: Vec<ConfigOutcome>,
    /// Files added to the git index after the run.
    pub staged: Vec<NormalizedPath>,
    /// Set when the project could not be processed or staging failed.
    pub error: Option<String>,
}

/// A created, updated or failed entry worth listing after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub project: String,
    /// `None` for project-level failures.
    pub config_type: Option<ConfigType>,
    pub status: ApplyStatus,
    pub message: Option<String>,
}

/// Counters and details for a whole batch run.
#[derive(Debug, Clone, Default)]
pub struct ApplySummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub errors: usize,
    pub projects_processed: usize,
    pub changes: Vec<Change>,
    pub error_messages: Vec<String>,
    /// Per-project results, in configuration order.
    pub projects: Vec<ProjectReport>,
}

impl ApplySummary {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    fn record(&mut self, report: ProjectReport) {
        self.projects_processed += 1;

        if let Some(error) = &report.error {
            self.errors += 1;
            self.error_messages.push(format!("{}: {error}", report.name));
            self.changes.push(Change {
                project: report.name.clone(),
                config_type: None,
                status: ApplyStatus::Error,
                message: Some(error.clone()),
            });
        }

        for outcome in &report.results {
            let result = &outcome.result;
            match result.status {
                ApplyStatus::Created => self.created += 1,
                ApplyStatus::Updated => self.updated += 1,
                ApplyStatus::Unchanged => self.unchanged += 1,
                ApplyStatus::Skipped => self.skipped += 1,
                ApplyStatus::Error => {
                    self.errors += 1;
                    self.error_messages.push(format!(
                        "{}: {}: {}",
                        report.name,
                        outcome.config_type,
                        result.message.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
            if result.status.is_change() || result.is_error() {
                self.changes.push(Change {
                    project: report.name.clone(),
                    config_type: Some(outcome.config_type),
                    status: result.status,
                    message: result.message.clone(),
                });
            }
        }

        self.projects.push(report);
    }
}

/// Apply configs to every selected project.
///
/// # Errors
///
/// Returns a `Configuration` error, before any project is touched, when a
/// filter names an unknown project or config type. Failures while applying
/// are recorded on the summary instead.
pub fn apply_configs(
    config: &FleetConfig,
    options: &ApplyOptions,
    filters: &ApplyFilters,
    progress: &dyn ProgressSink,
) -> Result<ApplySummary> {
    let projects = select_projects(config, &filters.projects)?;
    let config_types = select_config_types(&filters.config_types)?;

    let run = Run {
        config,
        options,
        config_types: &config_types,
        template_dir: config.template_dir(),
        locks: PathLocks::new(),
        progress,
        total: projects.len(),
        finished: AtomicUsize::new(0),
    };

    let jobs = options.jobs.max(1).min(projects.len().max(1));
    tracing::debug!(
        projects = projects.len(),
        jobs,
        dry_run = options.dry_run,
        "starting batch"
    );

    let reports = if jobs == 1 {
        projects.iter().map(|p| run.project(p)).collect()
    } else {
        run.parallel(&projects, jobs)
    };

    let mut summary = ApplySummary::default();
    for report in reports {
        summary.record(report);
    }
    Ok(summary)
}

fn select_projects<'c>(config: &'c FleetConfig, names: &[String]) -> Result<Vec<&'c ProjectConfig>> {
    for name in names {
        if config.project(name).is_none() {
            let suggestions = closest_names(name, config.project_names());
            return Err(Error::configuration(unknown_name_message(
                "project",
                name,
                &suggestions,
            )));
        }
    }

    Ok(config
        .projects
        .iter()
        .filter(|p| names.is_empty() || names.contains(&p.name))
        .collect())
}

fn select_config_types(names: &[String]) -> Result<Vec<ConfigType>> {
    names.iter().map(|name| name.parse()).collect()
}

/// Shared state of one batch run.
struct Run<'a> {
    config: &'a FleetConfig,
    options: &'a ApplyOptions,
    /// Config type filter; empty selects all.
    config_types: &'a [ConfigType],
    template_dir: NormalizedPath,
    locks: PathLocks,
    progress: &'a dyn ProgressSink,
    total: usize,
    finished: AtomicUsize,
}

impl Run<'_> {
    /// Work-queue over scoped threads; each report lands in its own slot.
    fn parallel(&self, projects: &[&ProjectConfig], jobs: usize) -> Vec<ProjectReport> {
        let next = AtomicUsize::new(0);
        let slots: Vec<Mutex<Option<ProjectReport>>> =
            projects.iter().map(|_| Mutex::new(None)).collect();

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|| {
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(project) = projects.get(index) else {
                            break;
                        };
                        let report = self.project(project);
                        *slots[index].lock().unwrap_or_else(PoisonError::into_inner) =
                            Some(report);
                    }
                });
            }
        });

        slots
            .into_iter()
            .zip(projects)
            .map(|(slot, project)| {
                slot.into_inner()
                    .unwrap_or_else(PoisonError::into_inner)
                    .unwrap_or_else(|| ProjectReport {
                        name: project.name.clone(),
                        path: NormalizedPath::from_user(&project.path),
                        results: Vec::new(),
                        staged: Vec::new(),
                        error: Some("worker stopped before finishing".to_string()),
                    })
            })
            .collect()
    }

    fn project(&self, project: &ProjectConfig) -> ProjectReport {
        let _span = tracing::info_span!("project", name = %project.name).entered();
        self.progress.project_started(&project.name);

        let report = self.apply_project(project);

        let index = self.finished.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress
            .project_finished(&project.name, index, self.total);
        report
    }

    fn apply_project(&self, project: &ProjectConfig) -> ProjectReport {
        let mut report = ProjectReport {
            name: project.name.clone(),
            path: self.config.resolve_path(&project.path),
            results: Vec::new(),
            staged: Vec::new(),
            error: None,
        };

        let effective = match self.config.effective(project) {
            Ok(effective) => effective,
            Err(e) => {
                tracing::warn!(error = %e, "project configuration rejected");
                report.error = Some(e.to_string());
                return report;
            }
        };

        if !effective.path.is_dir() {
            let e = Error::ProjectNotFound {
                path: effective.path.to_native(),
            };
            tracing::warn!(error = %e, "project skipped");
            report.error = Some(e.to_string());
            return report;
        }

        let ctx = ApplyContext {
            project: &effective,
            template_dir: &self.template_dir,
            options: self.options,
            locks: &self.locks,
        };

        for config_type in effective
            .configs
            .iter()
            .copied()
            .filter(|t| self.config_types.is_empty() || self.config_types.contains(t))
        {
            let result = handlers::apply(config_type, &ctx);
            self.progress
                .config_finished(&project.name, config_type, &result);
            report.results.push(ConfigOutcome {
                config_type,
                result,
            });
        }

        if self.options.git_add && !self.options.dry_run {
            self.stage(&effective, &mut report);
        }

        report
    }

    /// `git add` every file this project's run wrote.
    fn stage(&self, project: &EffectiveConfig, report: &mut ProjectReport) {
        let mut files: Vec<NormalizedPath> = Vec::new();
        for outcome in &report.results {
            let file = project.path.join(outcome.config_type.output_file());
            if outcome.result.outcome == Outcome::Applied && !files.contains(&file) {
                files.push(file);
            }
        }
        if files.is_empty() {
            return;
        }

        match git::stage(&project.path, &files, &self.locks) {
            Ok(true) => report.staged = files,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "staging failed");
                report.error = Some(e.to_string());
            }
        }
    }
}
