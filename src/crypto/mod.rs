// src/crypto/mod.rs
//! Crypto engine: record AEAD and blind-index trapdoors
//!
//! Pure in-memory operations over an immutable `KeyHierarchy`; no I/O, no
//! database. Only ciphertext and trapdoors leave this module.

mod decrypt;
mod encrypt;
mod trapdoor;

use std::sync::Arc;

use chacha20poly1305::{Key, KeyInit, XChaCha20Poly1305};

use crate::keys::KeyHierarchy;

pub use trapdoor::Trapdoor;

/// Cheap to clone; every clone shares the same key hierarchy
#[derive(Debug, Clone)]
pub struct CryptoEngine {
    keys: Arc<KeyHierarchy>,
}

impl CryptoEngine {
    pub fn new(keys: Arc<KeyHierarchy>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &KeyHierarchy {
        &self.keys
    }

    fn aead(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(
            self.keys.encryption_key().expose_secret(),
        ))
    }
}
