//! Line-edit handler: set values in `.gitlab-ci.yml` without reformatting it
//!
//! Each edit names a key by its slash path (`/image`, `/renovate/image/name`).
//! The key's line is found by indentation and only the value after the colon
//! is replaced, so comments, anchors and layout elsewhere stay as written.
//! Only block mappings are walked; keys inside sequences or flow collections
//! are not addressable.

use std::fmt;
use std::str::FromStr;

use fleet_fs::{NormalizedPath, io};

use super::template_copy::check_format;
use super::{ApplyContext, ApplyResult, RenderContext, TemplateFormat, commit, render};
use crate::{Error, Result};

/// Slash-separated path to a mapping key, such as `/variables/PYTHON_IMAGE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct YamlPath {
    segments: Vec<String>,
}

impl YamlPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for YamlPath {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, String> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(format!("path '{raw}' must start with '/'"));
        };
        let segments: Vec<String> = rest.split('/').map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(format!("path '{raw}' has an empty segment"));
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for YamlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// One value to set; `value` may hold `{{ ... }}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlEdit {
    pub path: YamlPath,
    pub value: String,
}

pub(super) fn apply(target: &NormalizedPath, ctx: &ApplyContext<'_>) -> Result<ApplyResult> {
    let edits = &ctx.project.gitlab_ci_edits;
    if edits.is_empty() {
        return Ok(ApplyResult::skipped("no gitlab_ci edits configured"));
    }
    let Some(original) = io::read_optional_text(target)? else {
        return Ok(ApplyResult::skipped(".gitlab-ci.yml not found"));
    };

    let render_ctx = RenderContext::from(ctx.project);
    let mut content = original.clone();
    let mut missing = Vec::new();
    for edit in edits {
        let value = render(&edit.value, &render_ctx).map_err(|message| Error::Template {
            path: target.to_native(),
            message: format!("{}: {message}", edit.path),
        })?;
        match set_value(&content, &edit.path, &value) {
            Some(updated) => content = updated,
            None => {
                tracing::warn!(path = %edit.path, file = %target, "YAML path not found");
                missing.push(edit.path.to_string());
            }
        }
    }

    check_format(&content, TemplateFormat::Yaml, ".gitlab-ci.yml")?;

    let result = commit(target, Some(&original), &content, ctx)?;
    Ok(if missing.is_empty() {
        result
    } else {
        result.with_message(format!("path not found: {}", missing.join(", ")))
    })
}

/// Replace the value of the key at `path`, or `None` when no such key line
/// exists.
pub(crate) fn set_value(content: &str, path: &YamlPath, value: &str) -> Option<String> {
    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
    let index = locate(&lines, path)?;

    let line = &lines[index];
    let body = line.trim_end_matches(['\n', '\r']);
    let ending = &line[body.len()..];
    let entry = KeyLine::parse(body)?;

    let mut prefix = body[..entry.value_start].to_string();
    if !prefix.ends_with([' ', '\t']) {
        prefix.push(' ');
    }
    let replaced = format!("{prefix}{value}{ending}");
    lines[index] = replaced;
    Some(lines.concat())
}

/// Index of the line holding the last key of `path`.
fn locate(lines: &[String], path: &YamlPath) -> Option<usize> {
    let mut start = 0;
    let mut end = lines.len();
    let mut found = None;

    for segment in path.segments() {
        let level = (start..end).find_map(|i| content_indent(&lines[i]))?;
        let index = (start..end).find(|&i| {
            KeyLine::parse(&lines[i])
                .is_some_and(|entry| entry.indent == level && entry.key == *segment)
        })?;

        found = Some(index);
        start = index + 1;
        end = scope_end(lines, start, end, level);
    }
    found
}

/// First line at or after `from` that no longer belongs to a key indented by
/// `parent`. A sequence at the key's own indent still belongs to it.
fn scope_end(lines: &[String], from: usize, limit: usize, parent: usize) -> usize {
    (from..limit)
        .find(|&i| {
            let line = &lines[i];
            content_indent(line).is_some_and(|indent| {
                indent < parent || (indent == parent && !line.trim_start().starts_with('-'))
            })
        })
        .unwrap_or(limit)
}

/// Indentation of a line that carries content; blank and comment lines have
/// none.
fn content_indent(line: &str) -> Option<usize> {
    let trimmed = line.trim_start_matches(' ');
    let text = trimmed.trim();
    if text.is_empty() || text.starts_with('#') {
        None
    } else {
        Some(line.len() - trimmed.len())
    }
}

/// A `key: value` line of a block mapping.
#[derive(Debug, PartialEq, Eq)]
struct KeyLine<'a> {
    indent: usize,
    key: &'a str,
    /// Byte offset where the value starts, after the colon and its spacing.
    value_start: usize,
}

impl<'a> KeyLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim_start_matches(' ');
        let indent = line.len() - trimmed.len();
        if trimmed.is_empty() || trimmed.starts_with(['#', '-']) {
            return None;
        }

        let (key, after_key) = match trimmed.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let close = trimmed[1..].find(quote)? + 1;
                (&trimmed[1..close], close + 1)
            }
            _ => {
                let colon = trimmed.match_indices(':').map(|(i, _)| i).find(|&i| {
                    let after = &trimmed[i + 1..];
                    after.is_empty() || after.starts_with([' ', '\t'])
                })?;
                (trimmed[..colon].trim_end(), colon)
            }
        };

        let rest = trimmed[after_key..].trim_start_matches([' ', '\t']);
        let rest = rest.strip_prefix(':')?;
        let spacing = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let value_start = line.len() - rest.len() + spacing;

        Some(Self {
            indent,
            key,
            value_start,
        })
    }
}
