// src/lib.rs
//! encrypted-record-vault: searchable encryption over SQLite
//!
//! Features:
//! - Records encrypted at rest with XChaCha20-Poly1305
//! - Exact-match lookup through salted HMAC-SHA256 trapdoors (blind index)
//! - One root secret, HKDF-derived purpose keys
//! - Blob + postings committed in a single transaction

pub mod config;
pub mod consts;
pub mod crypto;
pub mod db;
pub mod demo;
pub mod keys;
pub mod record;
pub mod storage;
pub mod vault;

pub mod error;

// Re-export everything users need at the crate root
pub use config::load as load_config;
pub use config::Config;
pub use crypto::{CryptoEngine, Trapdoor};
pub use error::{CoreError, CoreResult};
pub use keys::{derive_key, DerivedKey, GlobalSalt, KeyHierarchy, KeyMaterial, RootSecret};
pub use record::{normalize_term, Record};
pub use storage::{StorageEngine, StorageOptions};
pub use vault::open_vault;
