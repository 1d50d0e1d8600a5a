use fleet_fs::{NormalizedPath, expand_user};
use proptest::prelude::*;
use std::path::PathBuf;

proptest! {
    #[test]
    fn normalized_paths_never_contain_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn join_then_file_name_yields_segment(
        base in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}",
        name in "[a-zA-Z0-9_.-]{1,12}",
    ) {
        prop_assume!(name != "." && name != "..");
        let joined = NormalizedPath::new(&base).join(&name);
        prop_assert_eq!(joined.file_name(), Some(name.as_str()));
        prop_assert_eq!(joined.parent().map(|p| p.as_str().to_string()), Some(base));
    }

    #[test]
    fn appended_suffix_keeps_prefix(base in "/[a-z]{1,8}/[a-z.]{1,12}") {
        let path = NormalizedPath::new(&base);
        let backup = path.with_appended_suffix(".bak");
        prop_assert!(backup.as_str().starts_with(path.as_str()));
        prop_assert!(backup.as_str().ends_with(".bak"));
    }

    #[test]
    fn expand_user_ignores_paths_without_leading_tilde(s in "[a-z/][a-z0-9/~]*") {
        prop_assert_eq!(expand_user(&s), PathBuf::from(&s));
    }
}
