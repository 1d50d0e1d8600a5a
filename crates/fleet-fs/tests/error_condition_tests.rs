//! Error handling under adverse filesystem conditions

use fleet_fs::{NormalizedPath, io};
use tempfile::tempdir;

#[test]
fn read_text_nonexistent_file_is_not_found() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("does_not_exist.toml"));

    let err = io::read_text(&path).unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("does_not_exist.toml"));
}

#[test]
fn write_text_creates_missing_parents() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("a").join("b").join(".pre-commit-config.yaml"));

    io::write_text(&path, "repos: []\n").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "repos: []\n");
}

#[test]
fn write_atomic_leaves_no_temp_files() {
    let dir = tempdir().unwrap();
    let path = NormalizedPath::new(dir.path().join("target.toml"));

    io::write_text(&path, "a = 1\n").unwrap();
    io::write_text(&path, "a = 2\n").unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found {leftovers:?}");
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::fs::{self, Permissions};
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn unreadable_file_is_an_error_not_missing() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("pyproject.toml");
        fs::write(&file_path, "[project]\n").unwrap();
        fs::set_permissions(&file_path, Permissions::from_mode(0o000)).unwrap();

        let result = io::read_optional_text(&NormalizedPath::new(&file_path));

        let _ = fs::set_permissions(&file_path, Permissions::from_mode(0o644));
        assert!(result.is_err(), "permission failure must not read as absent");
    }

    #[test]
    fn failed_write_preserves_original() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let dir = tempdir().unwrap();
        let parent = dir.path().join("parent");
        fs::create_dir(&parent).unwrap();
        let file_path = parent.join("existing.toml");
        fs::write(&file_path, "original").unwrap();
        fs::set_permissions(&parent, Permissions::from_mode(0o555)).unwrap();

        let result = io::write_text(&NormalizedPath::new(&file_path), "new content");

        let _ = fs::set_permissions(&parent, Permissions::from_mode(0o755));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original");
    }
}
