// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{Index, Paths, Storage};
use crate::consts::{APP_DIR_NAME, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_FILE, DEFAULT_SEARCHABLE_FIELD};

pub const DEFAULT_CONFIG_FILE: &str = "vault-config.toml";

/// Platform data dir, or `./vault-data` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("vault-data"))
}

pub fn default_paths() -> Paths {
    let base = default_data_dir();
    Paths {
        key_dir: base.join("keys"),
        database: base.join(DEFAULT_DB_FILE),
    }
}

pub fn default_index() -> Index {
    Index {
        searchable_fields: default_searchable_fields(),
        integrity_tags: false,
    }
}

pub fn default_storage() -> Storage {
    Storage {
        busy_timeout_ms: default_busy_timeout_ms(),
    }
}

pub fn default_searchable_fields() -> Vec<String> {
    vec![DEFAULT_SEARCHABLE_FIELD.to_owned()]
}

pub fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}
