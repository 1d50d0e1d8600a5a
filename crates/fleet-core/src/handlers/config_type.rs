//! The closed set of configuration types a project can receive

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// How a rendered file-copy template is checked before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Toml,
    Yaml,
    Json,
    /// Plain text, written as rendered.
    Text,
}

impl TemplateFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Text => "text",
        }
    }
}

/// How a config type turns a template into a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Render the template and replace the file wholesale.
    FileCopy(TemplateFormat),
    /// Merge template sections into the existing document.
    StructuralMerge,
    /// Rewrite pinned entries of `project.dependencies` in place.
    DependencyRewrite,
    /// Set values at YAML key paths, leaving every other line as written.
    LineEdit,
}

/// A configuration type, addressed by its kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigType {
    PreCommit,
    Ruff,
    Yamllint,
    Prettier,
    PythonVersion,
    Dockerignore,
    Gitignore,
    Renovate,
    License,
    Pyproject,
    DependencyPins,
    GitlabCi,
}

impl ConfigType {
    pub const ALL: [ConfigType; 12] = [
        Self::PreCommit,
        Self::Ruff,
        Self::Yamllint,
        Self::Prettier,
        Self::PythonVersion,
        Self::Dockerignore,
        Self::Gitignore,
        Self::Renovate,
        Self::License,
        Self::Pyproject,
        Self::DependencyPins,
        Self::GitlabCi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::PreCommit => "pre-commit",
            Self::Ruff => "ruff",
            Self::Yamllint => "yamllint",
            Self::Prettier => "prettier",
            Self::PythonVersion => "python-version",
            Self::Dockerignore => "dockerignore",
            Self::Gitignore => "gitignore",
            Self::Renovate => "renovate",
            Self::License => "license",
            Self::Pyproject => "pyproject",
            Self::DependencyPins => "dependency-pins",
            Self::GitlabCi => "gitlab-ci",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::PreCommit => "pre-commit hooks configuration",
            Self::Ruff => "Ruff linter and formatter settings",
            Self::Yamllint => "yamllint rules",
            Self::Prettier => "Prettier formatting options",
            Self::PythonVersion => "Python version pin for pyenv and uv",
            Self::Dockerignore => "Docker build context exclusions",
            Self::Gitignore => "Git ignore patterns",
            Self::Renovate => "Renovate dependency update settings",
            Self::License => "Project license text",
            Self::Pyproject => "Shared pyproject.toml sections, merged in place",
            Self::DependencyPins => "Pinned requirement strings in project.dependencies",
            Self::GitlabCi => "Value edits in .gitlab-ci.yml, layout kept",
        }
    }

    /// File written in the project directory.
    pub fn output_file(self) -> &'static str {
        match self {
            Self::PreCommit => ".pre-commit-config.yaml",
            Self::Ruff => ".ruff.toml",
            Self::Yamllint => ".yamllint.yaml",
            Self::Prettier => ".prettierrc",
            Self::PythonVersion => ".python-version",
            Self::Dockerignore => ".dockerignore",
            Self::Gitignore => ".gitignore",
            Self::Renovate => "renovate.json",
            Self::License => "LICENSE",
            Self::Pyproject | Self::DependencyPins => "pyproject.toml",
            Self::GitlabCi => ".gitlab-ci.yml",
        }
    }

    /// Template location relative to the template directory.
    ///
    /// `None` for types without a template. The license template depends on
    /// the project's license type and is resolved by the handler.
    pub fn template_path(self) -> Option<String> {
        match self {
            Self::DependencyPins | Self::GitlabCi => None,
            Self::Pyproject => Some("pyproject/sections.toml".to_string()),
            Self::License => Some("license".to_string()),
            other => Some(format!("{}/{}", other.name(), other.output_file())),
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            Self::PreCommit | Self::Yamllint => Strategy::FileCopy(TemplateFormat::Yaml),
            Self::Ruff => Strategy::FileCopy(TemplateFormat::Toml),
            Self::Prettier | Self::Renovate => Strategy::FileCopy(TemplateFormat::Json),
            Self::PythonVersion | Self::Dockerignore | Self::Gitignore | Self::License => {
                Strategy::FileCopy(TemplateFormat::Text)
            }
            Self::Pyproject => Strategy::StructuralMerge,
            Self::DependencyPins => Strategy::DependencyRewrite,
            Self::GitlabCi => Strategy::LineEdit,
        }
    }

    /// Look up a type by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Self::name)
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| {
            let suggestions = crate::config::closest_names(s, Self::names());
            Error::configuration(crate::config::unknown_name_message(
                "config type",
                s,
                &suggestions,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for config_type in ConfigType::ALL {
            assert_eq!(
                config_type.name().parse::<ConfigType>().ok(),
                Some(config_type)
            );
        }
    }

    #[test]
    fn unknown_name_suggests_close_match() {
        let err = "pre-comit".parse::<ConfigType>().unwrap_err();
        assert!(err.to_string().contains("pre-commit"), "{err}");
    }

    #[test]
    fn file_copy_templates_live_under_type_name() {
        assert_eq!(
            ConfigType::Ruff.template_path().as_deref(),
            Some("ruff/.ruff.toml")
        );
        assert_eq!(
            ConfigType::Renovate.template_path().as_deref(),
            Some("renovate/renovate.json")
        );
        assert_eq!(ConfigType::DependencyPins.template_path(), None);
        assert_eq!(ConfigType::GitlabCi.template_path(), None);
    }

    #[test]
    fn pyproject_types_share_output_file() {
        assert_eq!(
            ConfigType::Pyproject.output_file(),
            ConfigType::DependencyPins.output_file()
        );
    }
}
