// src/crypto/encrypt.rs
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::XNonce;
use rand::RngCore;
use zeroize::Zeroizing;

use super::CryptoEngine;
use crate::consts::{BLOB_VERSION, NONCE_LEN, TAG_LEN};
use crate::error::{CoreError, CoreResult};
use crate::record::Record;

impl CryptoEngine {
    /// Encrypt a record → `version ‖ nonce ‖ ciphertext ‖ tag`
    ///
    /// A fresh random nonce per call, so the same record never encrypts to
    /// the same blob twice.
    pub fn encrypt_record(&self, record: &Record) -> CoreResult<Vec<u8>> {
        let plaintext = Zeroizing::new(serde_json::to_vec(record)?);

        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .aead()
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_slice(),
                    aad: &[BLOB_VERSION],
                },
            )
            .map_err(|_| CoreError::InvalidRecord("record too large to encrypt".into()))?;

        let mut blob = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        blob.push(BLOB_VERSION);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        debug_assert!(blob.len() >= 1 + NONCE_LEN + TAG_LEN);
        Ok(blob)
    }
}
