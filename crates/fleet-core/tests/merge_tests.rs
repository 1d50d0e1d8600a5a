//! Structural merge behavior on realistic pyproject files

mod common;

use common::{OWNED_PATHS, merge_normalized, path, pyproject_source, template};
use fleet_content::Document;
use fleet_core::merge::{ALWAYS_PRESERVE, MergeError, MergePolicy, merge};
use proptest::prelude::*;
use serde_json::json;

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_project_version_kept_when_template_lacks_it() {
        let target = Document::parse("[project]\nname = \"app\"\nversion = \"2.3.0\"\n").unwrap();

        let merged = merge_normalized(&template(), &target, &MergePolicy::default(), &[]);

        assert_eq!(merged.get_json(&path("project.version")), Some(json!("2.3.0")));
        assert_eq!(merged.get_json(&path("project.name")), Some(json!("app")));
        assert_eq!(
            merged.get_json(&path("project.requires-python")),
            Some(json!(">=3.12"))
        );
    }

    #[test]
    fn test_ruff_line_length_overwritten() {
        let target = Document::parse("[tool.ruff]\nline-length = 80\nfix = true\n").unwrap();

        let result = merge(&template(), &target, &MergePolicy::default(), &[]).unwrap();

        assert_eq!(
            result.document.get_json(&path("tool.ruff.line-length")),
            Some(json!(110))
        );
        // Keys the template does not mention stay.
        assert_eq!(result.document.get_json(&path("tool.ruff.fix")), Some(json!(true)));
        assert!(result.overwritten.contains(&path("tool.ruff.line-length")));
        assert!(result.created.contains(&path("tool.ruff.lint")));
    }

    #[test]
    fn test_extra_preserved_path_survives() {
        let target = Document::parse(
            "[tool.mypy]\nstrict = false\nplugins = [\"sqlalchemy.ext.mypy.plugin\"]\n",
        )
        .unwrap();
        let policy = MergePolicy::from_strings(&["tool.mypy.plugins"]).unwrap();

        let result = merge(&template(), &target, &policy, &[]).unwrap();

        assert_eq!(
            result.document.get_json(&path("tool.mypy.plugins")),
            Some(json!(["sqlalchemy.ext.mypy.plugin"]))
        );
        assert_eq!(
            result.document.get_json(&path("tool.mypy.strict")),
            Some(json!(true))
        );
        assert!(result.preserved.contains(&path("tool.mypy.plugins")));
    }

    #[test]
    fn test_preserved_path_absent_from_target_stays_absent() {
        let target = Document::parse("[project]\nname = \"app\"\n").unwrap();
        let policy = MergePolicy::from_strings(&["tool.mypy.plugins"]).unwrap();

        let merged = merge_normalized(&template(), &target, &policy, &[]);

        assert!(!merged.contains(&path("tool.mypy.plugins")));
        assert_eq!(merged.get_json(&path("tool.mypy.strict")), Some(json!(true)));
    }

    #[test]
    fn test_preserving_a_whole_section() {
        let target = Document::parse("[tool.ruff]\nline-length = 79\n").unwrap();
        let policy = MergePolicy::from_strings(&["tool.ruff"]).unwrap();

        let merged = merge_normalized(&template(), &target, &policy, &[]);

        assert_eq!(
            merged.get_json(&path("tool.ruff")),
            Some(json!({ "line-length": 79 }))
        );
    }

    #[test]
    fn test_preserved_leaf_inside_owned_table() {
        let target =
            Document::parse("[tool.ruff.lint]\nselect = [\"ALL\"]\nignore = [\"D\"]\n").unwrap();
        let policy = MergePolicy::from_strings(&["tool.ruff.lint.ignore"]).unwrap();

        let merged = merge_normalized(&template(), &target, &policy, &[]);

        assert_eq!(
            merged.get_json(&path("tool.ruff.lint")),
            Some(json!({ "select": ["E", "F", "I"], "ignore": ["D"] }))
        );
    }

    #[test]
    fn test_unmentioned_sections_untouched() {
        let source = "[tool.black]\nline-length = 88  # legacy\n";
        let target = Document::parse(source).unwrap();

        let merged = merge_normalized(&template(), &target, &MergePolicy::default(), &[]);

        assert!(merged.serialize().contains("[tool.black]\nline-length = 88  # legacy\n"));
    }

    #[test]
    fn test_empty_target_receives_every_section() {
        let merged = merge_normalized(&template(), &Document::empty(), &MergePolicy::default(), &[]);

        for owned in OWNED_PATHS {
            assert_eq!(
                merged.get_json(&path(owned)),
                template().get_json(&path(owned)),
                "{owned}"
            );
        }
        assert!(!merged.serialize().starts_with('\n'));
    }

    #[test]
    fn test_inline_tool_table_is_merged_like_a_section() {
        let target =
            Document::parse("[tool]\nruff = { line-length = 80, fix = true }\n").unwrap();

        let merged = merge_normalized(&template(), &target, &MergePolicy::default(), &[]);

        assert_eq!(merged.get_json(&path("tool.ruff.line-length")), Some(json!(110)));
        assert_eq!(merged.get_json(&path("tool.ruff.fix")), Some(json!(true)));
        assert_eq!(
            merged.get_json(&path("tool.ruff.lint.select")),
            Some(json!(["E", "F", "I"]))
        );

        let again = merge_normalized(&template(), &merged, &MergePolicy::default(), &[]);
        assert_eq!(again.serialize(), merged.serialize());
    }

    #[test]
    fn test_template_values_never_replace_always_preserved_paths() {
        let template = Document::parse(
            "[project]\nname = \"tmpl\"\nversion = \"9\"\nrequires-python = \">=3.12\"\n\n[tool.mypy]\npackages = [\"x\"]\nstrict = true\n",
        )
        .unwrap();
        let target =
            Document::parse("[project]\nname = \"app\"\n\n[tool.mypy]\npackages = [\"app\"]\n")
                .unwrap();

        let result = merge(&template, &target, &MergePolicy::default(), &[]).unwrap();
        let merged = &result.document;

        assert_eq!(merged.get_json(&path("project.name")), Some(json!("app")));
        assert_eq!(merged.get_json(&path("project.version")), None);
        assert_eq!(merged.get_json(&path("tool.mypy.packages")), Some(json!(["app"])));
        assert_eq!(
            merged.get_json(&path("project.requires-python")),
            Some(json!(">=3.12"))
        );
        assert_eq!(merged.get_json(&path("tool.mypy.strict")), Some(json!(true)));
        for preserved in ["project.name", "project.version", "tool.mypy.packages"] {
            assert!(result.preserved.contains(&path(preserved)), "{preserved}");
        }
    }
}

mod dev_dependencies {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_union_keeps_template_order_then_new_extras() {
        let extras = vec!["mypy>=1.10".to_string(), "pytest".to_string()];

        let result = merge(&template(), &Document::empty(), &MergePolicy::default(), &extras).unwrap();

        assert_eq!(
            result.document.get_json(&path("dependency-groups.dev")),
            Some(json!(["pytest>=8", "ruff>=0.6", "mypy>=1.10"]))
        );
        assert_eq!(result.added_dev_dependencies, vec!["mypy>=1.10".to_string()]);
    }

    #[test]
    fn test_union_without_template_group() {
        let bare = Document::parse("[tool.ruff]\nline-length = 110\n").unwrap();
        let target = Document::parse("[dependency-groups]\ndev = [\n    \"pytest\",\n]\n").unwrap();
        let extras = vec!["types-requests".to_string()];

        let result = merge(&bare, &target, &MergePolicy::default(), &extras).unwrap();

        assert_eq!(
            result.document.get_json(&path("dependency-groups.dev")),
            Some(json!(["pytest", "types-requests"]))
        );
        assert!(
            result
                .document
                .serialize()
                .contains("dev = [\n    \"pytest\",\n    \"types-requests\",\n]")
        );
    }

    #[test]
    fn test_preserved_dev_group_is_left_alone() {
        let target = Document::parse("[dependency-groups]\ndev = [\"black\"]\n").unwrap();
        let policy = MergePolicy::from_strings(&["dependency-groups.dev"]).unwrap();
        let extras = vec!["mypy".to_string()];

        let result = merge(&template(), &target, &policy, &extras).unwrap();

        assert_eq!(
            result.document.get_json(&path("dependency-groups.dev")),
            Some(json!(["black"]))
        );
        assert!(result.added_dev_dependencies.is_empty());
    }

    #[test]
    fn test_union_into_inline_dependency_groups() {
        let template = Document::parse("[tool.ruff]\nline-length = 110\n").unwrap();
        let target = Document::parse("dependency-groups = { dev = [\"pytest\"] }\n").unwrap();
        let extras = vec!["mypy".to_string()];

        let result = merge(&template, &target, &MergePolicy::default(), &extras).unwrap();

        assert_eq!(
            result.document.get_json(&path("dependency-groups.dev")),
            Some(json!(["pytest", "mypy"]))
        );
        assert_eq!(result.added_dev_dependencies, vec!["mypy".to_string()]);
    }

    #[test]
    fn test_template_group_replaces_inline_target_group() {
        let target = Document::parse("dependency-groups = { dev = [\"black\"] }\n").unwrap();
        let extras = vec!["mypy".to_string()];

        let result = merge(&template(), &target, &MergePolicy::default(), &extras).unwrap();

        assert_eq!(
            result.document.get_json(&path("dependency-groups.dev")),
            Some(json!(["pytest>=8", "ruff>=0.6", "mypy"]))
        );
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_scalar_where_section_expected() {
        let target = Document::parse("build-system = \"hatch\"\n").unwrap();

        let err = merge(&template(), &target, &MergePolicy::default(), &[]).unwrap_err();

        assert!(matches!(
            err,
            MergeError::TypeMismatch { ref path, .. } if path == "build-system"
        ));
    }

    #[test]
    fn test_scalar_over_table_holding_preserved_keys() {
        let template = Document::parse("project = \"x\"\n").unwrap();
        let target = Document::parse("[project]\nname = \"app\"\n").unwrap();

        let err = merge(&template, &target, &MergePolicy::default(), &[]).unwrap_err();

        assert!(matches!(
            err,
            MergeError::TypeMismatch { ref path, .. } if path == "project"
        ));
    }

    #[test]
    fn test_array_of_tables_section_root_rejected() {
        let bad = Document::parse("[[tool.plugins]]\nname = \"x\"\n").unwrap();

        let err = merge(&bad, &Document::empty(), &MergePolicy::default(), &[]).unwrap_err();

        assert!(matches!(err, MergeError::InvalidTemplate { .. }));
    }
}

fn policy_strategy() -> impl Strategy<Value = MergePolicy> {
    proptest::sample::subsequence(
        vec!["tool.mypy.plugins", "tool.ruff", "dependency-groups.dev", "build-system"],
        0..=2,
    )
    .prop_map(|paths| MergePolicy::from_strings(&paths).expect("valid paths"))
}

proptest! {
    #[test]
    fn prop_merge_is_idempotent(
        source in pyproject_source(),
        policy in policy_strategy(),
        with_extras in any::<bool>(),
    ) {
        let extras: Vec<String> = if with_extras {
            vec!["mypy".to_string(), "pytest".to_string()]
        } else {
            Vec::new()
        };
        let target = Document::parse(&source).unwrap();

        let once = merge_normalized(&template(), &target, &policy, &extras);
        let reparsed = Document::parse(&once.serialize()).unwrap();
        let twice = merge_normalized(&template(), &reparsed, &policy, &extras);

        prop_assert_eq!(once.serialize(), twice.serialize());
    }

    #[test]
    fn prop_always_preserved_paths_keep_target_values(source in pyproject_source()) {
        let target = Document::parse(&source).unwrap();

        let merged = merge_normalized(&template(), &target, &MergePolicy::default(), &[]);

        for preserved in ALWAYS_PRESERVE {
            let p = path(preserved);
            prop_assert_eq!(merged.get_json(&p), target.get_json(&p), "{}", preserved);
        }
    }

    #[test]
    fn prop_owned_paths_take_template_values(source in pyproject_source()) {
        let target = Document::parse(&source).unwrap();
        let template = template();

        let merged = merge_normalized(&template, &target, &MergePolicy::default(), &[]);

        for owned in OWNED_PATHS {
            let p = path(owned);
            prop_assert_eq!(merged.get_json(&p), template.get_json(&p), "{}", owned);
        }
    }
}
