//! Classification of key paths into preserved and template-owned

use fleet_content::KeyPath;

/// Fields every project keeps regardless of template content: identity,
/// runtime dependencies, build targets and per-project type-check overrides.
pub const ALWAYS_PRESERVE: &[&str] = &[
    "project.name",
    "project.version",
    "project.description",
    "project.dependencies",
    "tool.hatch.build.targets.wheel",
    "tool.mypy.packages",
    "tool.mypy.overrides",
];

/// How the merge treats one key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Listed (or below a path listed) in [`ALWAYS_PRESERVE`].
    AlwaysPreserve,
    /// Listed (or below a path listed) in the project's `preserve_sections`.
    ExtraPreserve,
    /// Everything else the template mentions.
    TemplateOverwrite,
}

/// The preserved path sets for one project.
#[derive(Debug, Clone)]
pub struct MergePolicy {
    always: Vec<KeyPath>,
    extra: Vec<KeyPath>,
}

impl MergePolicy {
    /// Policy with the fixed allowlist plus the project's extra paths.
    pub fn new(extra: impl IntoIterator<Item = KeyPath>) -> Self {
        let always: Vec<KeyPath> = ALWAYS_PRESERVE
            .iter()
            .filter_map(|p| KeyPath::parse(p).ok())
            .collect();
        let mut extra_paths: Vec<KeyPath> = Vec::new();
        for path in extra {
            if !always.contains(&path) && !extra_paths.contains(&path) {
                extra_paths.push(path);
            }
        }
        Self {
            always,
            extra: extra_paths,
        }
    }

    /// Parse `preserve_sections` strings into a policy.
    pub fn from_strings<S: AsRef<str>>(extra: &[S]) -> fleet_content::Result<Self> {
        let parsed = extra
            .iter()
            .map(|s| KeyPath::parse(s.as_ref()))
            .collect::<fleet_content::Result<Vec<_>>>()?;
        Ok(Self::new(parsed))
    }

    pub fn classify(&self, path: &KeyPath) -> PathClass {
        if self.always.iter().any(|p| path.starts_with(p)) {
            PathClass::AlwaysPreserve
        } else if self.extra.iter().any(|p| path.starts_with(p)) {
            PathClass::ExtraPreserve
        } else {
            PathClass::TemplateOverwrite
        }
    }

    /// True when `path` or one of its ancestors is preserved.
    pub fn is_preserved(&self, path: &KeyPath) -> bool {
        self.classify(path) != PathClass::TemplateOverwrite
    }

    /// True when some preserved path lies strictly below `path`.
    pub fn has_preserved_below(&self, path: &KeyPath) -> bool {
        self.preserved_paths().any(|p| path.is_ancestor_of(p))
    }

    pub fn preserved_paths(&self) -> impl Iterator<Item = &KeyPath> {
        self.always.iter().chain(self.extra.iter())
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
