//! Serde model of the fleet config file

use std::collections::BTreeMap;

use fleet_fs::{ConfigStore, NormalizedPath, expand_user};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

fn default_template_dir() -> String {
    "./templates".to_string()
}

fn default_python_version() -> String {
    "3.12".to_string()
}

/// The whole fleet config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetConfig {
    /// Root of the template tree.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub projects: Vec<ProjectConfig>,

    /// Directory of the file this config was loaded from.
    #[serde(skip)]
    pub base_dir: Option<NormalizedPath>,
}

/// Values every project inherits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default = "default_python_version")]
    pub python_version: String,

    /// Config types applied to every project.
    #[serde(default)]
    pub configs: Vec<String>,

    /// Template variables, available as `{{ vars.<key> }}`.
    #[serde(default)]
    pub vars: BTreeMap<String, Value>,

    /// Package name to full requirement string.
    #[serde(default)]
    pub dependency_pins: BTreeMap<String, String>,

    /// `.gitlab-ci.yml` edits shared by every project.
    #[serde(default)]
    pub gitlab_ci: GitlabCiOptions,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            python_version: default_python_version(),
            configs: Vec::new(),
            vars: BTreeMap::new(),
            dependency_pins: BTreeMap::new(),
            gitlab_ci: GitlabCiOptions::default(),
        }
    }
}

/// One project entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
    pub path: String,

    /// Config types added on top of the defaults.
    #[serde(default)]
    pub configs: Vec<String>,

    #[serde(default)]
    pub exclude_configs: Vec<String>,

    #[serde(default)]
    pub vars: BTreeMap<String, Value>,

    /// Config type name to a template path used instead of the shared one.
    #[serde(default)]
    pub template_overrides: BTreeMap<String, String>,

    #[serde(default)]
    pub pyproject: PyprojectOptions,

    #[serde(default)]
    pub gitignore: IgnoreOptions,

    #[serde(default)]
    pub dockerignore: IgnoreOptions,

    #[serde(default)]
    pub license: LicenseOptions,

    #[serde(default)]
    pub dependency_pins: BTreeMap<String, String>,

    #[serde(default)]
    pub gitlab_ci: GitlabCiOptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PyprojectOptions {
    /// Dotted key paths kept from the project's own pyproject.toml.
    #[serde(default)]
    pub preserve_sections: Vec<String>,

    /// Requirements appended to `dependency-groups.dev`.
    #[serde(default)]
    pub extra_dev_deps: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreOptions {
    /// Lines appended after the rendered template.
    #[serde(default)]
    pub extra_lines: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseOptions {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitlabCiOptions {
    #[serde(default)]
    pub edits: Vec<GitlabCiEdit>,
}

/// Set the key at `path` (`/job/image`) to `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitlabCiEdit {
    pub path: String,
    pub value: String,
}

impl FleetConfig {
    /// Load a config file; the format follows the file extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let mut config: FleetConfig = ConfigStore::new().load(path)?;
        config.base_dir = path.parent();
        tracing::debug!(
            path = %path,
            projects = config.projects.len(),
            "loaded fleet config"
        );
        Ok(config)
    }

    /// Expand `~` and anchor relative paths at the config file's directory.
    pub fn resolve_path(&self, raw: &str) -> NormalizedPath {
        let expanded = expand_user(raw);
        match &self.base_dir {
            Some(base) if expanded.is_relative() => {
                base.join(NormalizedPath::new(&expanded).as_str())
            }
            _ => NormalizedPath::new(expanded),
        }
    }

    pub fn template_dir(&self) -> NormalizedPath {
        self.resolve_path(&self.template_dir)
    }

    pub fn project(&self, name: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|p| p.name.as_str())
    }

    /// Resolve `project` and anchor its paths at this config's location.
    pub fn effective(&self, project: &ProjectConfig) -> Result<super::EffectiveConfig> {
        let mut effective = super::resolve(&self.defaults, project)?;
        effective.path = self.resolve_path(&project.path);
        for (config_type, path) in effective.template_overrides.iter_mut() {
            if let Some(raw) = project.template_overrides.get(config_type.name()) {
                *path = self.resolve_path(raw);
            }
        }
        Ok(effective)
    }
}
