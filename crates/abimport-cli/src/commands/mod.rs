//! Subcommand implementations.

pub mod config;
pub mod parse;
pub mod process;
pub mod template;

use std::path::{Path, PathBuf};

use abimport_core::models::config::AppConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("abimport")
        .join("config.json")
}

/// Load the config named on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    if let Some(path) = config_path {
        return Ok(AppConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(AppConfig::from_file(&default_path)?)
    } else {
        Ok(AppConfig::default())
    }
}
