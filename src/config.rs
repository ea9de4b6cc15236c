use directory_models::{Config, DirectoryError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Explicit config file location; skips the search below.
pub const CONFIG_PATH_ENV: &str = "DIRECTORY_CONFIG";
pub const ENV_PREFIX: &str = "DIRECTORY_";

const CONFIG_PATHS: [&str; 2] = ["configs/default.toml", "config/config.toml"];

fn config_file() -> Option<String> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(path);
    }
    CONFIG_PATHS
        .iter()
        .find(|path| Path::new(path).exists())
        .map(|path| path.to_string())
}

/// Defaults, then the config file, then `DIRECTORY_*` variables, then `API_KEY`.
pub fn figment() -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = config_file() {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["config", "log_json"])
                .split("__"),
        )
        .merge(Env::raw().only(&["API_KEY"]).map(|_| "auth.api_key".into()))
}

pub fn load_config() -> Result<Config, DirectoryError> {
    figment()
        .extract()
        .map_err(|e| DirectoryError::ConfigError {
            reason: e.to_string(),
        })
}

/// Create the data directory and, for file-backed SQLite, the database file.
pub fn prepare_storage(config: &Config) -> Result<(), DirectoryError> {
    let storage_error = |e: std::io::Error| DirectoryError::ConfigError {
        reason: e.to_string(),
    };

    if !config.data.dir.is_empty() {
        fs::create_dir_all(&config.data.dir).map_err(storage_error)?;
    }

    let Some(db_path) = config.data.sqlite_path() else {
        return Ok(());
    };

    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }
    }

    if !Path::new(db_path).exists() {
        match fs::File::create(db_path) {
            Ok(_) => info!("Created database file: {}", db_path),
            Err(e) => {
                warn!("Failed to create database file {}: {}", db_path, e);
                return Err(storage_error(e));
            }
        }
    }

    Ok(())
}
