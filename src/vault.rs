// src/vault.rs
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::crypto::CryptoEngine;
use crate::error::CoreResult;
use crate::keys::KeyHierarchy;
use crate::storage::{StorageEngine, StorageOptions};

/// Key files → key hierarchy → crypto engine → storage engine.
///
/// First run creates the root secret and salt; later runs load them and
/// fail fast if either file has the wrong length.
pub fn open_vault(config: &Config) -> CoreResult<StorageEngine> {
    let keys = Arc::new(KeyHierarchy::load_or_create(&config.paths.key_dir)?);
    let crypto = CryptoEngine::new(keys);
    let engine = StorageEngine::open(&config.paths.database, crypto, StorageOptions::from(config))?;

    info!(
        database = %config.paths.database.display(),
        integrity_tags = config.index.integrity_tags,
        "vault open"
    );
    Ok(engine)
}
