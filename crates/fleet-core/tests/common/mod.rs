//! Shared fixtures for fleet-core integration tests

#![allow(dead_code)]

use fleet_content::{Document, KeyPath, normalize};
use fleet_core::{MergePolicy, merge};
use proptest::prelude::*;

/// Shared sections, as a fleet would keep them in `pyproject/sections.toml`.
pub const TEMPLATE: &str = r#"[project]
requires-python = ">=3.12"
license = "MIT"

[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

# Lint settings shared by every project
[tool.ruff]
line-length = 110
target-version = "py312"

[tool.ruff.lint]
select = ["E", "F", "I"]

[tool.mypy]
strict = true
plugins = ["pydantic.mypy"]

[dependency-groups]
dev = ["pytest>=8", "ruff>=0.6"]
"#;

/// Template-owned paths of [`TEMPLATE`].
pub const OWNED_PATHS: &[&str] = &[
    "project.requires-python",
    "project.license",
    "build-system.requires",
    "build-system.build-backend",
    "tool.ruff.line-length",
    "tool.ruff.target-version",
    "tool.ruff.lint",
    "tool.mypy.strict",
    "tool.mypy.plugins",
    "dependency-groups.dev",
];

pub fn path(s: &str) -> KeyPath {
    KeyPath::parse(s).expect("valid key path")
}

pub fn template() -> Document {
    Document::parse(TEMPLATE).expect("template parses")
}

/// Merge and normalize, the way the pyproject handler does.
pub fn merge_normalized(
    template: &Document,
    target: &Document,
    policy: &MergePolicy,
    extra_dev_deps: &[String],
) -> Document {
    let merged = merge(template, target, policy, extra_dev_deps).expect("merge succeeds");
    normalize(&merged.document).expect("normalized output parses")
}

/// Realistic pyproject.toml files: an ordered subset of typical sections with
/// varying values and spacing.
pub fn pyproject_source() -> impl Strategy<Value = String> {
    (
        "[0-9]\\.[0-9]{1,2}\\.[0-9]",
        60u32..130,
        0usize..3,
        proptest::sample::subsequence((0..7).collect::<Vec<usize>>(), 0..=7),
    )
        .prop_map(|(version, line_length, gap, picked)| {
            let blank = "\n".repeat(gap);
            let fragments = [
                format!(
                    "[project]\nname = \"pkg\"\nversion = \"{version}\"\ndescription = \"A package\"\ndependencies = [\n    \"requests>=2\",\n    \"pydantic\",\n]\n"
                ),
                "[build-system]\nrequires = [\"setuptools\"]\nbuild-backend = \"setuptools.build_meta\"\n".to_string(),
                format!("# ruff\n[tool.ruff]\nline-length = {line_length}\nextend-exclude = [\"docs\"]\n"),
                "[tool.black]\nline-length = 88\n".to_string(),
                "[tool.mypy]\nstrict = false\nplugins = [\"sqlalchemy.ext.mypy.plugin\"]\n\n[[tool.mypy.overrides]]\nmodule = \"vendored.*\"\nignore_missing_imports = true\n".to_string(),
                "[tool.hatch.build.targets.wheel]\npackages = [\"src/pkg\"]\n".to_string(),
                "[dependency-groups]\ndev = [\"pytest\", \"black\"]\ndocs = [\"mkdocs\"]\n".to_string(),
            ];
            picked
                .into_iter()
                .map(|i| fragments[i].clone())
                .collect::<Vec<_>>()
                .join(&blank)
        })
}
