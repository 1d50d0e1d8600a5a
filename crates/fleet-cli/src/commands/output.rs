//! Colored rendering of batch results

use colored::{ColoredString, Colorize};
use fleet_core::{ApplyResult, ApplyStatus, ApplySummary, ConfigType, ProgressSink};

/// One-character marker for a status.
pub fn glyph(status: ApplyStatus) -> ColoredString {
    match status {
        ApplyStatus::Created => "+".green().bold(),
        ApplyStatus::Updated => "~".yellow().bold(),
        ApplyStatus::Unchanged => "✓".green(),
        ApplyStatus::Skipped => "-".dimmed(),
        ApplyStatus::Error => "!".red().bold(),
    }
}

fn status_label(status: ApplyStatus) -> ColoredString {
    match status {
        ApplyStatus::Created => status.as_str().green(),
        ApplyStatus::Updated => status.as_str().yellow(),
        ApplyStatus::Unchanged => status.as_str().normal(),
        ApplyStatus::Skipped => status.as_str().dimmed(),
        ApplyStatus::Error => status.as_str().red(),
    }
}

/// Print a unified diff with colored additions and removals.
pub fn print_diff(diff: &str) {
    for line in diff.lines() {
        let colored = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else if line.starts_with("@@") {
            line.cyan()
        } else {
            line.normal()
        };
        println!("      {colored}");
    }
}

fn print_result(config_type: ConfigType, result: &ApplyResult, show_diff: bool) {
    let message = result
        .message
        .as_deref()
        .map(|m| format!("  {}", m.dimmed()))
        .unwrap_or_default();
    println!(
        "  {} {:<16} {}{}",
        glyph(result.status),
        config_type.name(),
        status_label(result.status),
        message
    );
    if show_diff && let Some(diff) = &result.diff {
        print_diff(diff);
    }
}

/// Print per-project results in configuration order, then the totals.
pub fn print_summary(summary: &ApplySummary, show_diff: bool) {
    for project in &summary.projects {
        println!("{} {}", project.name.bold(), project.path.as_str().dimmed());
        if let Some(error) = &project.error {
            println!("  {} {}", glyph(ApplyStatus::Error), error.red());
        }
        for outcome in &project.results {
            print_result(outcome.config_type, &outcome.result, show_diff);
        }
        if !project.staged.is_empty() {
            let files: Vec<&str> = project
                .staged
                .iter()
                .filter_map(|file| file.file_name())
                .collect();
            println!("  {} {}", "git add:".dimmed(), files.join(", "));
        }
    }

    println!();
    println!(
        "{} {} created, {} updated, {} unchanged, {} skipped, {} errors ({} projects)",
        "Summary:".bold(),
        summary.created.to_string().green(),
        summary.updated.to_string().yellow(),
        summary.unchanged,
        summary.skipped,
        if summary.errors > 0 {
            summary.errors.to_string().red()
        } else {
            summary.errors.to_string().normal()
        },
        summary.projects_processed
    );
}

/// Progress lines on stderr, used with `--verbose`.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn project_finished(&self, project: &str, index: usize, total: usize) {
        eprintln!("{} {}", format!("[{index}/{total}]").dimmed(), project);
    }
}
