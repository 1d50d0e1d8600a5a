//! Structural-merge handler for `pyproject.toml`
//!
//! Runs the file through `NotLoaded -> Loaded -> Merged -> Normalized ->
//! Diffed`, each stage a type consuming the previous one. The last stage
//! commits (or skips) through the shared handler tail.

use fleet_content::{DiffReport, Document, normalize};
use fleet_fs::{NormalizedPath, io};

use super::{ApplyContext, ApplyResult, ConfigType, commit_report, read_template};
use crate::merge::{MergeResult, merge};
use crate::{Error, Result};

pub(super) fn apply(target: &NormalizedPath, ctx: &ApplyContext<'_>) -> Result<ApplyResult> {
    let template = load_template(ctx)?;
    Loaded::read(target)?
        .merge(&template, ctx)?
        .normalize()?
        .diff(target)
        .finish(target, ctx)
}

fn load_template(ctx: &ApplyContext<'_>) -> Result<Document> {
    let Some(path) = ctx.template_for(ConfigType::Pyproject) else {
        return Err(Error::configuration("pyproject has no template path"));
    };
    let source = read_template(&path)?;
    Document::parse(&source).map_err(|e| Error::parse(path.as_str(), e))
}

/// The target as found on disk; an absent file loads as an empty document.
struct Loaded {
    original: Option<String>,
    document: Document,
}

struct Merged {
    original: Option<String>,
    merged: MergeResult,
}

struct Normalized {
    original: Option<String>,
    document: Document,
    summary: String,
}

struct Diffed {
    had_original: bool,
    report: DiffReport,
    content: String,
    summary: String,
}

impl Loaded {
    fn read(target: &NormalizedPath) -> Result<Self> {
        let original = io::read_optional_text(target)?;
        let document = match &original {
            Some(source) => Document::parse(source).map_err(|e| Error::parse(target.as_str(), e))?,
            None => Document::empty(),
        };
        Ok(Self { original, document })
    }

    fn merge(self, template: &Document, ctx: &ApplyContext<'_>) -> Result<Merged> {
        let project = ctx.project;
        let merged = merge(
            template,
            &self.document,
            &project.merge_policy(),
            &project.extra_dev_deps,
        )?;
        Ok(Merged {
            original: self.original,
            merged,
        })
    }
}

impl Merged {
    fn normalize(self) -> Result<Normalized> {
        let document = normalize(&self.merged.document)?;
        Ok(Normalized {
            summary: summarize(&self.merged),
            original: self.original,
            document,
        })
    }
}

impl Normalized {
    fn diff(self, target: &NormalizedPath) -> Diffed {
        let content = self.document.serialize();
        let report = DiffReport::compute(
            self.original.as_deref(),
            &content,
            target.file_name().unwrap_or(""),
        );
        Diffed {
            had_original: self.original.is_some(),
            report,
            content,
            summary: self.summary,
        }
    }
}

impl Diffed {
    fn finish(self, target: &NormalizedPath, ctx: &ApplyContext<'_>) -> Result<ApplyResult> {
        let result = commit_report(target, self.report, self.had_original, &self.content, ctx)?;
        Ok(if result.status.is_change() {
            result.with_message(self.summary)
        } else {
            result
        })
    }
}

/// One-line account of a merge for the summary output.
fn summarize(merged: &MergeResult) -> String {
    let mut parts = Vec::new();
    let mut count = |n: usize, what: &str| {
        if n > 0 {
            parts.push(format!("{n} {what}"));
        }
    };
    count(merged.overwritten.len(), "overwritten");
    count(merged.created.len(), "added");
    count(merged.preserved.len(), "preserved");
    count(merged.added_dev_dependencies.len(), "dev dependencies added");

    if parts.is_empty() {
        "no template sections".to_string()
    } else {
        parts.join(", ")
    }
}
