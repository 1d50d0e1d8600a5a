//! Fleet configuration: loading, per-project resolution and validation
//!
//! A fleet config is one YAML (or TOML/JSON) file listing shared defaults and
//! the projects that receive them:
//!
//! ```yaml
//! template_dir: ./templates
//! defaults:
//!   python_version: "3.12"
//!   configs: [pyproject, gitignore]
//! projects:
//!   - name: app
//!     path: ~/src/app
//!     exclude_configs: [gitignore]
//!     pyproject: { preserve_sections: [tool.mypy.plugins] }
//! ```
//!
//! # Resolution
//!
//! Each project is resolved against the defaults into an [`EffectiveConfig`]:
//!
//! 1. **Config types** - defaults first, then the project's additions, minus
//!    `exclude_configs`
//! 2. **Vars, dependency pins and `gitlab_ci` edits** - project values
//!    override defaults per key (per path for edits)
//! 3. **Paths** - `~` is expanded; relative paths are taken from the
//!    directory holding the config file

mod model;
mod resolver;
mod suggest;
mod validation;

pub use model::{
    Defaults, FleetConfig, GitlabCiEdit, GitlabCiOptions, IgnoreOptions, LicenseOptions,
    ProjectConfig, PyprojectOptions,
};
pub use resolver::{DEFAULT_LICENSE, EffectiveConfig, resolve};
pub use suggest::{closest_names, unknown_name_message};
pub use validation::{validate, validate_structure};
