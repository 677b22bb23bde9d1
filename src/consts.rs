// src/consts.rs
//! Shared constants: security parameters, on-disk names and defaults

/// Root secret length in bytes (256-bit)
pub const ROOT_SECRET_LEN: usize = 32;

/// Global salt length in bytes (128-bit)
pub const GLOBAL_SALT_LEN: usize = 16;

/// Every derived subkey is 256-bit
pub const DERIVED_KEY_LEN: usize = 32;

/// File holding the raw root secret inside the key directory
pub const ROOT_SECRET_FILE: &str = "secret.key";

/// File holding the raw global salt inside the key directory
pub const GLOBAL_SALT_FILE: &str = "salt.bin";

/// HKDF context labels: one per cryptographic purpose.
/// Changing any of these orphans every blob and posting written before.
pub const ENCRYPTION_KEY_LABEL: &[u8] = b"encryption-key";
pub const TRAPDOOR_KEY_LABEL: &[u8] = b"trapdoor-key";
pub const INDEX_INTEGRITY_KEY_LABEL: &[u8] = b"index-integrity-key";

/// Current encrypted blob layout: version ‖ nonce ‖ ciphertext ‖ tag
pub const BLOB_VERSION: u8 = 1;

/// XChaCha20-Poly1305 nonce length
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length
pub const TAG_LEN: usize = 16;

/// Trapdoors are hex-rendered HMAC-SHA256 outputs
pub const TRAPDOOR_HEX_LEN: usize = 64;

/// Field tokenized into search terms when a record does not say otherwise
pub const DEFAULT_SEARCHABLE_FIELD: &str = "name";

/// Default SQLite busy timeout: long enough to ride out a concurrent writer
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Default database file name inside the data directory
pub const DEFAULT_DB_FILE: &str = "records.db";

/// Application directory name under the platform data dir
pub const APP_DIR_NAME: &str = "encrypted-record-vault";
