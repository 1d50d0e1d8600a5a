//! Defaults-to-project cascade

use std::collections::BTreeMap;

use fleet_content::KeyPath;
use fleet_fs::NormalizedPath;
use serde_json::Value;

use super::model::{Defaults, ProjectConfig};
use crate::handlers::{ConfigType, YamlEdit, YamlPath};
use crate::merge::MergePolicy;
use crate::{Error, Result};

/// License template used when a project does not name one.
pub const DEFAULT_LICENSE: &str = "Apache-2.0";

/// Everything needed to apply configs to one project.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub name: String,
    pub path: NormalizedPath,
    /// Config types to apply, in order, without duplicates.
    pub configs: Vec<ConfigType>,
    pub python_version: String,
    pub vars: BTreeMap<String, Value>,
    pub dependency_pins: BTreeMap<String, String>,
    pub template_overrides: BTreeMap<ConfigType, NormalizedPath>,
    pub preserve_sections: Vec<KeyPath>,
    pub extra_dev_deps: Vec<String>,
    pub gitignore_extra_lines: Vec<String>,
    pub dockerignore_extra_lines: Vec<String>,
    pub license_type: String,
    /// `.gitlab-ci.yml` edits, defaults first; a project edit replaces the
    /// default for the same path.
    pub gitlab_ci_edits: Vec<YamlEdit>,
}

impl EffectiveConfig {
    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy::new(self.preserve_sections.iter().cloned())
    }

    /// Lines appended to the rendered template of `config_type`.
    pub fn extra_lines(&self, config_type: ConfigType) -> &[String] {
        match config_type {
            ConfigType::Gitignore => &self.gitignore_extra_lines,
            ConfigType::Dockerignore => &self.dockerignore_extra_lines,
            _ => &[],
        }
    }
}

/// Resolve one project against the shared defaults.
///
/// Paths are `~`-expanded but otherwise taken as written; see
/// [`FleetConfig::effective`](super::FleetConfig::effective) for anchoring
/// relative paths.
///
/// # Errors
///
/// A `Configuration` error listing every problem found: unknown config type
/// names, malformed `preserve_sections` or `gitlab_ci` paths and empty
/// dev-dependency strings.
pub fn resolve(defaults: &Defaults, project: &ProjectConfig) -> Result<EffectiveConfig> {
    let mut problems = Vec::new();

    let mut configs: Vec<ConfigType> = Vec::new();
    for name in defaults.configs.iter().chain(&project.configs) {
        match parse_type(name, &mut problems) {
            Some(config_type) if !configs.contains(&config_type) => configs.push(config_type),
            _ => {}
        }
    }
    let excluded: Vec<ConfigType> = project
        .exclude_configs
        .iter()
        .filter_map(|name| parse_type(name, &mut problems))
        .collect();
    configs.retain(|c| !excluded.contains(c));

    let mut template_overrides = BTreeMap::new();
    for (name, path) in &project.template_overrides {
        if let Some(config_type) = parse_type(name, &mut problems) {
            template_overrides.insert(config_type, NormalizedPath::from_user(path));
        }
    }

    let mut preserve_sections = Vec::new();
    for raw in &project.pyproject.preserve_sections {
        match KeyPath::parse(raw) {
            Ok(path) => preserve_sections.push(path),
            Err(e) => problems.push(format!("preserve_sections: {e}")),
        }
    }

    if project
        .pyproject
        .extra_dev_deps
        .iter()
        .any(|dep| dep.trim().is_empty())
    {
        problems.push("extra_dev_deps contains an empty requirement".to_string());
    }

    let mut gitlab_ci_edits: Vec<YamlEdit> = Vec::new();
    for edit in defaults.gitlab_ci.edits.iter().chain(&project.gitlab_ci.edits) {
        let path = match edit.path.parse::<YamlPath>() {
            Ok(path) => path,
            Err(e) => {
                problems.push(format!("gitlab_ci: {e}"));
                continue;
            }
        };
        match gitlab_ci_edits.iter_mut().find(|existing| existing.path == path) {
            Some(existing) => existing.value.clone_from(&edit.value),
            None => gitlab_ci_edits.push(YamlEdit {
                path,
                value: edit.value.clone(),
            }),
        }
    }

    if !problems.is_empty() {
        return Err(Error::configuration(format!(
            "project '{}': {}",
            project.name,
            problems.join("; ")
        )));
    }

    let mut vars = defaults.vars.clone();
    vars.extend(project.vars.clone());
    let mut dependency_pins = defaults.dependency_pins.clone();
    dependency_pins.extend(project.dependency_pins.clone());

    Ok(EffectiveConfig {
        name: project.name.clone(),
        path: NormalizedPath::from_user(&project.path),
        configs,
        python_version: defaults.python_version.clone(),
        vars,
        dependency_pins,
        template_overrides,
        preserve_sections,
        extra_dev_deps: project.pyproject.extra_dev_deps.clone(),
        gitignore_extra_lines: project.gitignore.extra_lines.clone(),
        dockerignore_extra_lines: project.dockerignore.extra_lines.clone(),
        license_type: project
            .license
            .kind
            .clone()
            .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
        gitlab_ci_edits,
    })
}

fn parse_type(name: &str, problems: &mut Vec<String>) -> Option<ConfigType> {
    match ConfigType::from_name(name) {
        Some(config_type) => Some(config_type),
        None => {
            let suggestions = super::closest_names(name, ConfigType::names());
            problems.push(super::unknown_name_message("config type", name, &suggestions));
            None
        }
    }
}
