// tests/common.rs
//! Shared test utilities: logging setup and throwaway vaults

use std::path::{Path, PathBuf};
use std::sync::Arc;

use encrypted_record_vault::{CryptoEngine, KeyHierarchy, Record, StorageEngine, StorageOptions};
use tempfile::TempDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging; respects RUST_LOG
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok(); // idempotent: safe to call multiple times
}

/// A vault rooted in its own temp directory: `keys/` + `records.db`
#[allow(dead_code)] // not every test binary touches every field
pub struct TestVault {
    pub engine: StorageEngine,
    pub keys: Arc<KeyHierarchy>,
    dir: TempDir,
}

#[allow(dead_code)]
impl TestVault {
    pub fn new() -> Self {
        Self::with_options(StorageOptions::default())
    }

    pub fn with_options(options: StorageOptions) -> Self {
        setup();
        let dir = tempfile::tempdir().expect("create temp dir");
        let keys = Arc::new(
            KeyHierarchy::load_or_create(dir.path().join("keys")).expect("create key material"),
        );
        let engine = StorageEngine::open(
            dir.path().join("records.db"),
            CryptoEngine::new(keys.clone()),
            options,
        )
        .expect("open storage");

        Self { engine, keys, dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn key_dir(&self) -> PathBuf {
        self.dir.path().join("keys")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("records.db")
    }

    /// A second, raw connection to the same database: for tampering and inspection
    pub fn raw_conn(&self) -> rusqlite::Connection {
        rusqlite::Connection::open(self.db_path()).expect("open raw connection")
    }

    /// Another engine on the same files, as a second process would see them
    pub fn reopen(&self, options: StorageOptions) -> StorageEngine {
        let keys = Arc::new(KeyHierarchy::load_or_create(self.key_dir()).expect("reload keys"));
        StorageEngine::open(self.db_path(), CryptoEngine::new(keys), options)
            .expect("reopen storage")
    }
}

#[allow(dead_code)]
pub fn aarav() -> Record {
    Record::new("id", "20001")
        .with_field("name", "Aarav Sharma")
        .with_field("balance", "7500")
}

#[allow(dead_code)]
pub fn crypto_with(root: u8, salt: u8) -> CryptoEngine {
    CryptoEngine::new(Arc::new(
        KeyHierarchy::from_bytes([root; 32], [salt; 16]).expect("derive keys"),
    ))
}
