//! `{{ ... }}` placeholder substitution for file-copy templates

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use crate::config::EffectiveConfig;

const PLACEHOLDER: &str = r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}";

/// Values a template may refer to.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub project_name: &'a str,
    pub project_path: &'a str,
    pub python_version: &'a str,
    pub vars: &'a BTreeMap<String, Value>,
}

impl<'a> From<&'a EffectiveConfig> for RenderContext<'a> {
    fn from(project: &'a EffectiveConfig) -> Self {
        Self {
            project_name: &project.name,
            project_path: project.path.as_str(),
            python_version: &project.python_version,
            vars: &project.vars,
        }
    }
}

impl RenderContext<'_> {
    fn lookup(&self, name: &str) -> Option<String> {
        match name {
            "project.name" => Some(self.project_name.to_string()),
            "project.path" => Some(self.project_path.to_string()),
            "defaults.python_version" => Some(self.python_version.to_string()),
            _ => {
                let key = name.strip_prefix("vars.")?;
                self.vars.get(key).map(|value| match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            }
        }
    }
}

/// Substitute every placeholder in `template`.
///
/// # Errors
///
/// Returns the name of the first placeholder with no value.
pub fn render(template: &str, ctx: &RenderContext<'_>) -> Result<String, String> {
    let pattern = Regex::new(PLACEHOLDER).map_err(|e| e.to_string())?;
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for captures in pattern.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = ctx
            .lookup(name.as_str())
            .ok_or_else(|| format!("unknown placeholder '{}'", name.as_str()))?;
        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&value);
        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}
