//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Distinguishes temp files of concurrent writers within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write content atomically to a file with locking.
///
/// Content goes to a temp file in the same directory, which is flushed and
/// then renamed over the target, so readers never observe a partial write.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    let written = temp_file
        .write_all(content)
        .and_then(|()| temp_file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(&native_path, e)
    })?;

    tracing::debug!(path = %path, bytes = content.len(), "wrote file");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, mapping a missing file to `None`.
///
/// Any other failure (permissions, invalid UTF-8, a directory in the way)
/// is still an error.
pub fn read_optional_text(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Copy `path` to `<path>.bak`, overwriting any previous backup.
///
/// Returns the backup path, or `None` when there is nothing to back up.
pub fn backup_file(path: &NormalizedPath) -> Result<Option<NormalizedPath>> {
    let Some(content) = read_optional_text(path)? else {
        return Ok(None);
    };

    let backup_path = path.with_appended_suffix(".bak");
    write_text(&backup_path, &content)?;
    tracing::info!(original = %path, backup = %backup_path, "created backup");
    Ok(Some(backup_path))
}
