//! Command implementations for fleet-cli

pub mod apply;
pub mod list;
pub mod output;
pub mod validate;

pub use apply::run_apply;
pub use list::{run_list_configs, run_list_projects};
pub use validate::{load_config, run_validate};
