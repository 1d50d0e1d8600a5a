//! Whole-config checks run before any project is touched

use std::collections::HashSet;

use super::model::FleetConfig;
use crate::{Error, Result};

/// Check a loaded config.
///
/// Reports duplicate or empty project names, empty project paths and every
/// per-project resolution problem in a single `Configuration` error.
pub fn validate(config: &FleetConfig) -> Result<()> {
    let mut problems = structural_problems(config);

    for project in &config.projects {
        match super::resolve(&config.defaults, project) {
            Ok(_) => {}
            Err(Error::Configuration { message }) => problems.push(message),
            Err(other) => problems.push(other.to_string()),
        }
    }

    into_result(problems)
}

/// Check only what concerns the fleet as a whole: project names and paths.
///
/// A project that fails to resolve is not an error here. The batch applier
/// reports it against that project and carries on with the others.
pub fn validate_structure(config: &FleetConfig) -> Result<()> {
    into_result(structural_problems(config))
}

fn structural_problems(config: &FleetConfig) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for project in &config.projects {
        if project.name.trim().is_empty() {
            problems.push("project with an empty name".to_string());
        } else if !seen.insert(project.name.as_str()) {
            problems.push(format!("duplicate project name '{}'", project.name));
        }
        if project.path.trim().is_empty() {
            problems.push(format!("project '{}' has an empty path", project.name));
        }
    }
    problems
}

fn into_result(problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::configuration(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> FleetConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let config = parse(
            "defaults: { configs: [pyproject] }\nprojects:\n  - { name: a, path: /a }\n  - { name: b, path: /b }\n",
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let config = parse("projects:\n  - { name: a, path: /a }\n  - { name: a, path: /b }\n");
        let message = validate(&config).unwrap_err().to_string();
        assert!(message.contains("duplicate project name 'a'"), "{message}");
    }

    #[test]
    fn unknown_default_config_is_rejected() {
        let config = parse("defaults: { configs: [pyprojekt] }\nprojects:\n  - { name: a, path: /a }\n");
        let message = validate(&config).unwrap_err().to_string();
        assert!(message.contains("pyprojekt"), "{message}");
        assert!(message.contains("pyproject"), "{message}");
    }

    #[test]
    fn structure_check_ignores_per_project_problems() {
        let config = parse(
            "projects:\n  - { name: good, path: /a }\n  - name: bad\n    path: /b\n    pyproject: { preserve_sections: ['tool..x'] }\n",
        );
        assert!(validate_structure(&config).is_ok());
        let message = validate(&config).unwrap_err().to_string();
        assert!(message.contains("project 'bad'"), "{message}");
    }

    #[test]
    fn structure_check_still_rejects_duplicates() {
        let config = parse("projects:\n  - { name: a, path: /a }\n  - { name: a, path: '' }\n");
        let message = validate_structure(&config).unwrap_err().to_string();
        assert!(message.contains("duplicate project name 'a'"), "{message}");
        assert!(message.contains("empty path"), "{message}");
    }
}
