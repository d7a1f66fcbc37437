//! Cross-Platform Path Utilities
//!
//! Resolves where the agent looks for its configuration file.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Directory name under the platform config dir
const APP_DIR: &str = "drupal-agent";

/// Get the agent's config directory (`<config_dir>/drupal-agent/`)
pub fn config_dir() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| AppError::config("Cannot find config directory"))
}

/// Get the default config file path (`<config_dir>/drupal-agent/config.toml`)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
