//! Union of extra development dependencies into `dependency-groups.dev`

use std::collections::HashSet;

use toml_edit::{Array, Value};

/// Indentation used for the first entry appended to an empty multi-line array.
const DEFAULT_INDENT: &str = "\n    ";

/// Package name of a requirement string: the text before the first version
/// specifier, extras, marker or URL character.
///
/// ```
/// use fleet_core::merge::package_name;
///
/// assert_eq!(package_name("pytest>=8.0.0"), "pytest");
/// assert_eq!(package_name("requests[socks] ; python_version>'3.8'"), "requests");
/// assert_eq!(package_name("my-lib @ git+https://example.com/my-lib"), "my-lib");
/// ```
pub fn package_name(requirement: &str) -> &str {
    let requirement = requirement.trim_start();
    let end = requirement
        .find(|c: char| "<>=!~;[@(".contains(c) || c.is_whitespace())
        .unwrap_or(requirement.len());
    &requirement[..end]
}

/// Append each extra whose package name is not already present.
///
/// Existing entries are never reordered or removed. Names compare
/// case-sensitively and the first occurrence wins. Returns the appended
/// requirement strings.
pub(crate) fn union_into(array: &mut Array, extras: &[String]) -> Vec<String> {
    let mut names: HashSet<String> = array
        .iter()
        .filter_map(Value::as_str)
        .map(|s| package_name(s).to_string())
        .collect();

    let pending: Vec<&String> = extras
        .iter()
        .filter(|extra| names.insert(package_name(extra).to_string()))
        .collect();
    if pending.is_empty() {
        return Vec::new();
    }

    let multiline = is_multiline(array);
    let indent = if multiline {
        move_closing_newline_to_trailing(array);
        array
            .iter()
            .last()
            .and_then(|v| v.decor().prefix())
            .and_then(|p| p.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_INDENT.to_string())
    } else {
        String::new()
    };

    for extra in &pending {
        if multiline {
            let mut value = Value::from(extra.as_str());
            value.decor_mut().set_prefix(indent.clone());
            value.decor_mut().set_suffix("");
            array.push_formatted(value);
        } else {
            array.push(extra.as_str());
        }
    }

    pending.into_iter().cloned().collect()
}

fn is_multiline(array: &Array) -> bool {
    let element_breaks = array.iter().any(|v| {
        v.decor()
            .prefix()
            .and_then(|p| p.as_str())
            .is_some_and(|p| p.contains('\n'))
    });
    element_breaks || array.trailing().as_str().is_some_and(|t| t.contains('\n'))
}

/// Without a trailing comma, the newline before `]` sits in the last
/// element's suffix. Move it to the array trailer so appended entries land
/// before it.
fn move_closing_newline_to_trailing(array: &mut Array) {
    if array.trailing_comma() {
        return;
    }
    let last_index = array.len().saturating_sub(1);
    let Some(last) = array.get_mut(last_index) else {
        return;
    };
    let suffix = last
        .decor()
        .suffix()
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_string();
    if !suffix.contains('\n') {
        return;
    }
    last.decor_mut().set_suffix("");
    let trailing = array.trailing().as_str().unwrap_or_default().to_string();
    array.set_trailing(format!("{suffix}{trailing}"));
}
