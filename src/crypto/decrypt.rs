// src/crypto/decrypt.rs
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::XNonce;
use zeroize::Zeroizing;

use super::CryptoEngine;
use crate::consts::{BLOB_VERSION, NONCE_LEN, TAG_LEN};
use crate::error::{CoreError, CoreResult};
use crate::record::Record;

impl CryptoEngine {
    /// Authenticate and decrypt a blob produced by `encrypt_record`.
    ///
    /// Any malformed, truncated or altered blob is an `AuthenticationFailure`;
    /// nothing is returned unless the tag verifies.
    pub fn decrypt_record(&self, blob: &[u8]) -> CoreResult<Record> {
        if blob.len() < 1 + NONCE_LEN + TAG_LEN || blob[0] != BLOB_VERSION {
            return Err(CoreError::AuthenticationFailure);
        }
        let (nonce, ciphertext) = blob[1..].split_at(NONCE_LEN);

        let plaintext = Zeroizing::new(
            self.aead()
                .decrypt(
                    XNonce::from_slice(nonce),
                    Payload {
                        msg: ciphertext,
                        aad: &blob[..1],
                    },
                )
                .map_err(|_| CoreError::AuthenticationFailure)?,
        );

        let record: Record = serde_json::from_slice(&plaintext)?;
        record.validate()?;
        Ok(record)
    }
}
