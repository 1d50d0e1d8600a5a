//! Dependency-rewrite handler: pin entries of `project.dependencies`

use std::collections::BTreeMap;

use fleet_content::Document;
use fleet_fs::{NormalizedPath, io};
use toml_edit::{Item, Value};

use super::{ApplyContext, ApplyResult, commit};
use crate::merge::package_name;
use crate::{Error, Result};

pub(super) fn apply(target: &NormalizedPath, ctx: &ApplyContext<'_>) -> Result<ApplyResult> {
    let pins = &ctx.project.dependency_pins;
    if pins.is_empty() {
        return Ok(ApplyResult::skipped("no dependency pins configured"));
    }
    let Some(original) = io::read_optional_text(target)? else {
        return Ok(ApplyResult::skipped("pyproject.toml not found"));
    };

    let mut document =
        Document::parse(&original).map_err(|e| Error::parse(target.as_str(), e))?;
    let pinned = pin_dependencies(&mut document, pins);
    for name in &pinned {
        tracing::debug!(package = %name, "pinned dependency");
    }

    let result = commit(target, Some(&original), &document.serialize(), ctx)?;
    Ok(if pinned.is_empty() {
        result
    } else {
        result.with_message(format!("pinned {}", pinned.join(", ")))
    })
}

/// Replace pinned entries in place, keeping each entry's decor.
///
/// Returns the package names whose requirement string changed.
pub(crate) fn pin_dependencies(
    document: &mut Document,
    pins: &BTreeMap<String, String>,
) -> Vec<String> {
    let Some(dependencies) = document
        .root_mut()
        .get_mut("project")
        .and_then(Item::as_table_like_mut)
        .and_then(|project| project.get_mut("dependencies"))
        .and_then(Item::as_array_mut)
    else {
        return Vec::new();
    };

    let mut pinned = Vec::new();
    for value in dependencies.iter_mut() {
        let Some(current) = value.as_str() else {
            continue;
        };
        let name = package_name(current);
        let Some(pin) = pins.get(name) else {
            continue;
        };
        if pin == current {
            continue;
        }

        pinned.push(name.to_string());
        let decor = value.decor().clone();
        let mut replacement = Value::from(pin.as_str());
        *replacement.decor_mut() = decor;
        *value = replacement;
    }
    pinned
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pins() -> BTreeMap<String, String> {
        BTreeMap::from([(
            "my-lib".to_string(),
            "my-lib @ git+https://example.com/my-lib@abc123".to_string(),
        )])
    }

    #[test]
    fn pins_matching_entries_and_keeps_layout() {
        let source = "[project]\nname = \"app\"\ndependencies = [\n    \"requests>=2\",\n    \"my-lib==0.1\",  # internal\n]\n";
        let mut document = Document::parse(source).unwrap();

        let pinned = pin_dependencies(&mut document, &pins());

        assert_eq!(pinned, vec!["my-lib".to_string()]);
        assert_eq!(
            document.serialize(),
            "[project]\nname = \"app\"\ndependencies = [\n    \"requests>=2\",\n    \"my-lib @ git+https://example.com/my-lib@abc123\",  # internal\n]\n"
        );
    }

    #[test]
    fn already_pinned_is_left_alone() {
        let source = "[project]\ndependencies = [\"my-lib @ git+https://example.com/my-lib@abc123\"]\n";
        let mut document = Document::parse(source).unwrap();
        assert!(pin_dependencies(&mut document, &pins()).is_empty());
        assert_eq!(document.serialize(), source);
    }

    #[test]
    fn missing_dependencies_is_a_no_op() {
        let mut document = Document::parse("[tool.ruff]\nline-length = 110\n").unwrap();
        assert!(pin_dependencies(&mut document, &pins()).is_empty());
    }
}
