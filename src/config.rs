use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::theme::ThemeConfig;

pub const APP_DIR: &str = "study-planner";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub theme: ThemeConfig,
}

impl Config {
    /// Load from an explicit path (which must exist) or from the default
    /// location (which may be missing).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// CLI flag, then config file, then the platform data directory.
    pub fn resolve_data_dir(&self, cli: Option<PathBuf>) -> Result<PathBuf> {
        cli.or_else(|| self.data_dir.clone())
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .ok_or_else(|| eyre!("no data directory available; pass --data-dir"))
    }

    pub fn resolve_log_level(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}
