//! Normalized path handling for project and template locations

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// Paths without a leading tilde, and tildes naming another user (`~bob/x`),
/// are returned unchanged.
pub fn expand_user(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

/// A path normalized to use forward slashes internally.
///
/// Fleet configs are written by hand on several platforms, so project paths
/// are stored with forward slashes and converted to native form only at the
/// I/O boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let inner = path.as_ref().to_string_lossy().replace('\\', "/");
        Self { inner }
    }

    /// Create a NormalizedPath from user input, expanding `~`.
    pub fn from_user(path: &str) -> Self {
        Self::new(expand_user(path))
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let inner = if self.inner.is_empty() {
            segment
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner }
    }

    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Extension of the file name, if any. Dotfiles such as `.prettierrc`
    /// have no extension.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Append a suffix to the file name (`pyproject.toml` -> `pyproject.toml.bak`).
    pub fn with_appended_suffix(&self, suffix: &str) -> Self {
        Self {
            inner: format!("{}{}", self.inner.trim_end_matches('/'), suffix),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Canonical absolute form, also used as a lock key.
    ///
    /// Falls back to the canonical parent joined with the file name when the
    /// file does not exist yet, and to the path itself when neither resolves.
    pub fn canonical(&self) -> PathBuf {
        let native = self.to_native();
        if let Ok(canonical) = dunce::canonicalize(&native) {
            return canonical;
        }
        match (native.parent(), native.file_name()) {
            (Some(parent), Some(name)) => dunce::canonicalize(parent)
                .map(|p| p.join(name))
                .unwrap_or(native),
            _ => native,
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
