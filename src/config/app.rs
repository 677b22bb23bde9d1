// src/config/app.rs
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::error::CoreResult;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_paths")]
    pub paths: Paths,
    #[serde(default = "default_index")]
    pub index: Index,
    #[serde(default = "default_storage")]
    pub storage: Storage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    /// Directory holding `secret.key` and `salt.bin`
    pub key_dir: PathBuf,
    pub database: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Index {
    /// Fields the CLI tokenizes into search terms; demo customers always index `name`
    #[serde(default = "default_searchable_fields")]
    pub searchable_fields: Vec<String>,
    /// Write and verify BLAKE3 posting tags under the index-integrity key
    #[serde(default)]
    pub integrity_tags: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: default_paths(),
            index: default_index(),
            storage: default_storage(),
        }
    }
}

impl Config {
    /// Parse a TOML config file; missing sections fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `ERV_KEY_DIR` / `ERV_DB` on top of whatever was loaded
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("ERV_KEY_DIR") {
            self.paths.key_dir = PathBuf::from(dir);
        }
        if let Ok(db) = env::var("ERV_DB") {
            self.paths.database = PathBuf::from(db);
        }
    }
}

/// Load config at runtime: `ERV_CONFIG` names the file, defaults if it is missing
pub fn load() -> CoreResult<Config> {
    let config_path = env::var("ERV_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut conf = if Path::new(&config_path).exists() {
        debug!(path = %config_path, "loading config");
        Config::from_file(&config_path)?
    } else {
        warn!(path = %config_path, "config file not found: using built-in defaults");
        Config::default()
    };

    conf.apply_env_overrides();
    Ok(conf)
}
