use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::notebook::DEFAULT_CACHE_CAPACITY;

const APP_NAME: &str = "nbdash";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_TITLE: &str = "Hospital Data Analysis Dashboard";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory holding the `.ipynb` files (flat).
    pub notebooks_dir: PathBuf,
    /// Directory holding the plot images (flat).
    pub images_dir: PathBuf,
    /// Maximum number of converted notebooks kept in memory.
    pub cache_capacity: usize,
    /// Heading shown above every panel.
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            notebooks_dir: PathBuf::from("notebooks"),
            images_dir: PathBuf::from("images"),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the user's config directory, then apply
    /// `NBDASH_*` environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|path| Self::load_file(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Read a JSON config file; a missing file yields the defaults.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("NBDASH_NOTEBOOKS_DIR") {
            self.notebooks_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("NBDASH_IMAGES_DIR") {
            self.images_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("NBDASH_CACHE_CAPACITY") {
            match raw.trim().parse() {
                Ok(capacity) => self.cache_capacity = capacity,
                Err(_) => tracing::warn!("Ignoring invalid NBDASH_CACHE_CAPACITY: {}", raw),
            }
        }
        if let Some(title) = lookup("NBDASH_TITLE") {
            self.title = title;
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
