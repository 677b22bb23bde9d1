// src/keys/hierarchy.rs
//! Purpose-scoped subkeys derived from the root secret
//!
//! ```text
//! HKDF-SHA256(ikm = root secret, salt = none, info = context label) -> 32 bytes
//! ```
//!
//! The root already carries full entropy, so no HKDF salt is used. Subkeys
//! are recomputed on every start and never persisted.

use std::fmt;
use std::path::Path;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::material::{GlobalSalt, KeyMaterial, RootSecret};
use crate::consts::{
    DERIVED_KEY_LEN, ENCRYPTION_KEY_LABEL, GLOBAL_SALT_LEN, INDEX_INTEGRITY_KEY_LABEL,
    ROOT_SECRET_LEN, TRAPDOOR_KEY_LABEL,
};
use crate::error::{CoreError, CoreResult};

/// A 256-bit subkey: zeroized on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; DERIVED_KEY_LEN]);

impl DerivedKey {
    pub fn expose_secret(&self) -> &[u8; DERIVED_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive the subkey for `context_label` from `root`
pub fn derive_key(root: &RootSecret, context_label: &[u8]) -> CoreResult<DerivedKey> {
    let hk = Hkdf::<Sha256>::new(None, root.expose_secret());
    let mut okm = [0u8; DERIVED_KEY_LEN];
    hk.expand(context_label, &mut okm)
        .map_err(|e| CoreError::Configuration(format!("hkdf expand failed: {e}")))?;
    Ok(DerivedKey(okm))
}

/// Immutable key configuration: root + salt + the three purpose keys.
///
/// Built once at startup and shared (by reference or `Arc`) with the crypto
/// and storage engines.
pub struct KeyHierarchy {
    root: RootSecret,
    salt: GlobalSalt,
    encryption: DerivedKey,
    trapdoor: DerivedKey,
    index_integrity: DerivedKey,
}

impl KeyHierarchy {
    pub fn new(material: KeyMaterial) -> CoreResult<Self> {
        let KeyMaterial { root, salt } = material;
        Ok(Self {
            encryption: derive_key(&root, ENCRYPTION_KEY_LABEL)?,
            trapdoor: derive_key(&root, TRAPDOOR_KEY_LABEL)?,
            index_integrity: derive_key(&root, INDEX_INTEGRITY_KEY_LABEL)?,
            root,
            salt,
        })
    }

    pub fn from_bytes(
        root: [u8; ROOT_SECRET_LEN],
        salt: [u8; GLOBAL_SALT_LEN],
    ) -> CoreResult<Self> {
        Self::new(KeyMaterial {
            root: RootSecret::from_bytes(root),
            salt: GlobalSalt::from_bytes(salt),
        })
    }

    /// Load (or create on first run) the key files in `key_dir` and derive everything
    pub fn load_or_create<P: AsRef<Path>>(key_dir: P) -> CoreResult<Self> {
        Self::new(KeyMaterial::load_or_create(key_dir)?)
    }

    /// Derive an additional subkey under a caller-chosen label
    pub fn derive(&self, context_label: &[u8]) -> CoreResult<DerivedKey> {
        derive_key(&self.root, context_label)
    }

    pub fn encryption_key(&self) -> &DerivedKey {
        &self.encryption
    }

    pub fn trapdoor_key(&self) -> &DerivedKey {
        &self.trapdoor
    }

    /// Reserved for posting-tamper detection; only used when integrity tags are on
    pub fn index_integrity_key(&self) -> &DerivedKey {
        &self.index_integrity
    }

    pub fn global_salt(&self) -> &GlobalSalt {
        &self.salt
    }
}

impl fmt::Debug for KeyHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHierarchy")
            .field("salt", &self.salt)
            .finish_non_exhaustive()
    }
}
