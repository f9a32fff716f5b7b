// Settings service
// Locates, loads and saves config.toml, and keeps the running copy the
// settings controller edits

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::models::settings::{Config, Preferences, SettingChange};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "planner.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "EventPlanner", "EventPlanner")
}

/// Platform config file location, e.g. `~/.config/eventplanner/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Where the database lives when the config doesn't say.
pub fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}

/// Read the config at `path`. A missing file yields the defaults; a file
/// that doesn't parse is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load from the platform location, or defaults when there is none.
pub fn load_default_config() -> Result<Config> {
    match default_config_path() {
        Some(path) => load_config(&path),
        None => {
            log::warn!("No home directory found, using default config");
            Ok(Config::default())
        }
    }
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, text).with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// The loaded config plus where to write it back. Without a path, changes
/// only live for the session.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config: Config,
    path: Option<PathBuf>,
}

impl SettingsStore {
    pub fn new(config: Config, path: Option<PathBuf>) -> Self {
        Self { config, path }
    }

    /// Session-only store, for tests and headless runs.
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, None)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn preferences(&self) -> &Preferences {
        &self.config.preferences
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply `change` and persist it. Returns whether anything changed. The
    /// change stays in effect even if writing the file fails.
    pub fn apply(&mut self, change: &SettingChange) -> Result<bool> {
        if !self.config.preferences.apply(change) {
            return Ok(false);
        }
        log::info!("Setting changed: {:?}", change);
        if let Some(path) = &self.path {
            save_config(&self.config, path)?;
        }
        Ok(true)
    }
}

/// Database path from the config, falling back to the data directory.
/// Creates the parent directory.
pub fn resolve_database_path(config: &Config) -> Result<PathBuf> {
    let path = config
        .database_path
        .clone()
        .unwrap_or_else(default_database_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }
    Ok(path)
}
