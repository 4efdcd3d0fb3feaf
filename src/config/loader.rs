use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::FunnelmapConfig;
use super::validation::validate_config;
use crate::core::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".funnelmap.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from TOML, replacing invalid sections with their defaults
pub fn parse_and_validate_config(contents: &str) -> Result<FunnelmapConfig> {
    let mut config = toml::from_str::<FunnelmapConfig>(contents)?;

    for problem in validate_config(&config) {
        log::warn!(
            "Invalid [{}] config: {}. Using defaults.",
            problem.section,
            problem.message
        );
        match problem.section {
            "defaults" => config.defaults = None,
            "insight" => config.insight = None,
            "scoring" => config.scoring = None,
            _ => {}
        }
    }

    Ok(config)
}

/// Load an explicitly named config file; any problem is an error
pub fn load_config_from(path: &Path) -> Result<FunnelmapConfig> {
    let contents = read_config_file(path)
        .map_err(Error::from)
        .context(format!("Cannot read {}", path.display()))?;
    let config = toml::from_str::<FunnelmapConfig>(&contents)
        .map_err(|e| Error::invalid_file(path, e.to_string()))?;

    if let Some(problem) = validate_config(&config).into_iter().next() {
        return Err(Error::Configuration(format!(
            "{}: [{}] {}",
            path.display(),
            problem.section,
            problem.message
        )));
    }

    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<FunnelmapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Failed to parse {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.funnelmap.toml` at or above `start`
pub fn discover_config(start: PathBuf) -> FunnelmapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            FunnelmapConfig::default()
        })
}

pub fn load_config() -> FunnelmapConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            FunnelmapConfig::default()
        }
    }
}
