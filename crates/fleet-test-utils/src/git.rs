//! Real git repositories for tests that stage files.

use std::path::{Path, PathBuf};

/// Initialise an empty git repository at `path`.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn init_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "init_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Paths currently in the index of the repository at `path`, relative to its
/// workdir.
///
/// # Panics
/// Panics if the repository or its index cannot be opened.
pub fn staged_paths(path: &Path) -> Vec<PathBuf> {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("staged_paths: cannot open {}: {e}", path.display()));
    let index = repo
        .index()
        .unwrap_or_else(|e| panic!("staged_paths: cannot read index: {e}"));
    index
        .iter()
        .map(|entry| PathBuf::from(String::from_utf8_lossy(&entry.path).into_owned()))
        .collect()
}
