//! Configuration for funnelmap.
//!
//! Settings come from `.funnelmap.toml`, found by walking up from the current
//! directory, or from a file passed with `--config`. Every section is
//! optional; missing sections use built-in defaults.

mod core;
mod loader;
pub mod validation;

pub use self::core::{DefaultsConfig, FunnelmapConfig, OutputConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use validation::{validate_config, ConfigProblem};
