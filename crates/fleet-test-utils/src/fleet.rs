//! [`TestFleet`] builder for fleet-config test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Shared pyproject sections used by [`TestFleet::with_standard_templates`].
pub const STANDARD_SECTIONS: &str = r#"[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"

[tool.ruff]
line-length = 110

[tool.ruff.lint]
select = ["E", "F", "I"]

[dependency-groups]
dev = [
    "pytest>=8",
    "ruff>=0.6",
]
"#;

/// A temporary directory holding `templates/`, `projects/<name>/` and
/// `config.yaml`.
///
/// # Example
///
/// ```rust,no_run
/// use fleet_test_utils::TestFleet;
///
/// let fleet = TestFleet::new();
/// fleet.with_standard_templates();
/// fleet.add_project("app", &[("pyproject.toml", "[project]\nname = \"app\"\n")]);
/// fleet.write_config("defaults: { configs: [pyproject] }\nprojects:\n  - { name: app, path: projects/app }\n");
/// ```
pub struct TestFleet {
    temp_dir: TempDir,
}

impl Default for TestFleet {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFleet {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root().join("templates")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.yaml")
    }

    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.root().join("projects").join(name)
    }

    /// Write `templates/<relative>`.
    pub fn add_template(&self, relative: &str, content: &str) -> &Self {
        write(&self.templates_dir().join(relative), content);
        self
    }

    /// Templates for pyproject, gitignore, ruff, python-version and the
    /// MIT and Apache-2.0 licenses.
    pub fn with_standard_templates(&self) -> &Self {
        self.add_template("pyproject/sections.toml", STANDARD_SECTIONS)
            .add_template("gitignore/.gitignore", "__pycache__/\n*.pyc\n")
            .add_template("ruff/.ruff.toml", "line-length = 110\n")
            .add_template(
                "python-version/.python-version",
                "{{ defaults.python_version }}\n",
            )
            .add_template(
                "license/MIT",
                "MIT License\n\nCopyright (c) {{ vars.author }}\n",
            )
            .add_template("license/Apache-2.0", "Apache License\nVersion 2.0\n")
    }

    /// Create `projects/<name>/` with the given files.
    pub fn add_project(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.project_dir(name);
        fs::create_dir_all(&dir).unwrap();
        for (relative, content) in files {
            write(&dir.join(relative), content);
        }
        dir
    }

    /// Write `config.yaml` and return its path.
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let path = self.config_path();
        write(&path, yaml);
        path
    }

    /// Read a file inside a project directory.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_project_file(&self, project: &str, relative: &str) -> String {
        let path = self.project_dir(project).join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Assert that a file inside a project directory exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_project_file_exists(&self, project: &str, relative: &str) {
        let path = self.project_dir(project).join(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that a file inside a project directory does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_project_file_not_exists(&self, project: &str, relative: &str) {
        let path = self.project_dir(project).join(relative);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
