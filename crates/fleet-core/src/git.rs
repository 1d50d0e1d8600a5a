//! Stage written files in the git repository that holds a project

use std::path::PathBuf;

use fleet_fs::{NormalizedPath, PathLocks};
use git2::{ErrorCode, Repository};

use crate::{Error, Result};

/// Add `files` to the index of the repository containing `project`.
///
/// Returns `Ok(false)` without touching anything when `project` is not inside
/// a git repository. Projects sharing one repository take turns on its index.
///
/// # Errors
///
/// Returns [`Error::Git`] when the repository is bare, a file lies outside its
/// workdir, or the index cannot be read or written.
pub fn stage(project: &NormalizedPath, files: &[NormalizedPath], locks: &PathLocks) -> Result<bool> {
    let fail = |message: String| Error::Git {
        path: project.to_native(),
        message,
    };

    let repo = match Repository::discover(project.to_native()) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => {
            tracing::debug!(project = %project, "not a git repository, nothing staged");
            return Ok(false);
        }
        Err(e) => return Err(fail(e.message().to_string())),
    };
    let workdir = repo
        .workdir()
        .map(|dir| NormalizedPath::new(dir).canonical())
        .ok_or_else(|| fail("repository has no working directory".to_string()))?;

    let relative = files
        .iter()
        .map(|file| {
            let absolute = file.canonical();
            absolute
                .strip_prefix(&workdir)
                .map(PathBuf::from)
                .map_err(|_| fail(format!("{file} is outside {}", workdir.display())))
        })
        .collect::<Result<Vec<_>>>()?;

    locks.lock(&NormalizedPath::new(repo.path())).run(|| {
        let mut index = repo.index().map_err(|e| fail(e.message().to_string()))?;
        index
            .read(true)
            .map_err(|e| fail(e.message().to_string()))?;
        for path in &relative {
            index
                .add_path(path)
                .map_err(|e| fail(format!("{}: {}", path.display(), e.message())))?;
        }
        index.write().map_err(|e| fail(e.message().to_string()))
    })?;

    tracing::info!(project = %project, files = relative.len(), "staged with git");
    Ok(true)
}
