use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# Funnelmap Configuration

[defaults]
cpm = 25.0
ctr = 0.02
avg_deal_size = 5000.0
# average, saas, ecommerce, financial-services, healthcare,
# manufacturing, professional-services, education
industry = "average"
# consumer, smb, middle-market, enterprise
# scale = "smb"

[insight]
# closed-won changes smaller than this (in percent) produce no insight
noise_threshold_pct = 0.1
bottleneck_threshold = 0.15

[scoring]
mql_threshold = 60
sql_threshold = 75

[output]
default_format = "terminal"
"#;

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

/// Write the default config into `dir`, returning the file's path.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if io::file_exists(&config_path) && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_and_validate_config, FunnelmapConfig};
    use tempfile::TempDir;

    #[test]
    fn default_config_round_trips_to_defaults() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.defaults(), FunnelmapConfig::default().defaults());
        assert_eq!(config.insight(), FunnelmapConfig::default().insight());
        assert_eq!(config.scoring(), FunnelmapConfig::default().scoring());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        init_config_in(dir.path(), false).unwrap();
        assert!(init_config_in(dir.path(), false).is_err());
        assert!(init_config_in(dir.path(), true).is_ok());
    }
}
