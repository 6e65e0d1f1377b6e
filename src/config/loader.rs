use crate::config::{Config, FossilConfig, NightscoutConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const CONFIG_ENV_VAR: &str = "POWERLINE_SEGMENTS_CONFIG";
pub const NIGHTSCOUT_URL_ENV_VAR: &str = "POWERLINE_SEGMENTS_NIGHTSCOUT_URL";
pub const FOSSIL_COMMAND_ENV_VAR: &str = "POWERLINE_SEGMENTS_FOSSIL_COMMAND";

/// Load configuration with priority: CLI args > Env vars > Config files > Defaults
pub async fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let mut config = if let Some(path) = config_path {
        load_config_file(&path).await?
    } else {
        load_config_from_default_locations().await
    };

    apply_env_overrides(&mut config);

    Ok(config)
}

async fn load_config_from_default_locations() -> Config {
    for path in get_config_search_paths() {
        if !path.exists() {
            continue;
        }
        match load_config_file(&path).await {
            Ok(config) => return config,
            Err(e) => {
                eprintln!("Warning: Failed to load config from {}: {:#}", path.display(), e);
            }
        }
    }

    Config::default()
}

/// Get list of paths to search for configuration files
pub fn get_config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".powerline-segments.json")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("powerline-segments").join("config.json"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("powerline-segments").join("config.json"));
    }

    paths.dedup();
    paths
}

pub async fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply environment variable overrides to configuration
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = env::var(NIGHTSCOUT_URL_ENV_VAR) {
        config
            .segments
            .nightscout
            .get_or_insert_with(NightscoutConfig::default)
            .url = Some(url);
    }

    if let Ok(command) = env::var(FOSSIL_COMMAND_ENV_VAR) {
        config
            .segments
            .fossil
            .get_or_insert_with(FossilConfig::default)
            .command = Some(command);
    }
}
