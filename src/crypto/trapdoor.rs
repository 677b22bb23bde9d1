// src/crypto/trapdoor.rs
//! Blind-index trapdoors and posting integrity tags
//!
//! ```text
//! trapdoor = hex(HMAC-SHA256(trapdoor key, global salt ‖ normalize(term)))
//! tag      = BLAKE3-keyed(index-integrity key, trapdoor ‖ 0x00 ‖ record id)
//! ```

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::CryptoEngine;
use crate::error::{CoreError, CoreResult};
use crate::record::normalize_term;

type HmacSha256 = Hmac<Sha256>;

/// Fixed-length hex token standing in for a search term
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Trapdoor(String);

impl Trapdoor {
    /// Rehydrate a trapdoor read back from the postings table
    pub(crate) fn from_stored(hex: String) -> Self {
        Trapdoor(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Trapdoor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Trapdoor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl CryptoEngine {
    /// Deterministic trapdoor for `term`; case and surrounding whitespace are ignored
    pub fn trapdoor(&self, term: &str) -> CoreResult<Trapdoor> {
        let normalized = normalize_term(term);

        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.keys.trapdoor_key().expose_secret())
            .map_err(|e| CoreError::Configuration(format!("trapdoor key rejected: {e}")))?;
        mac.update(self.keys.global_salt().as_bytes());
        mac.update(normalized.as_bytes());

        Ok(Trapdoor(hex::encode(mac.finalize().into_bytes())))
    }

    /// Integrity tag binding one posting to its record
    pub fn posting_tag(&self, trapdoor: &Trapdoor, record_id: &str) -> [u8; 32] {
        *self.posting_hash(trapdoor, record_id).as_bytes()
    }

    /// Constant-time check of a stored posting tag
    pub fn verify_posting_tag(&self, trapdoor: &Trapdoor, record_id: &str, tag: &[u8]) -> bool {
        match <[u8; 32]>::try_from(tag) {
            Ok(tag) => self.posting_hash(trapdoor, record_id) == tag,
            Err(_) => false,
        }
    }

    fn posting_hash(&self, trapdoor: &Trapdoor, record_id: &str) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(self.keys.index_integrity_key().expose_secret());
        hasher.update(trapdoor.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(record_id.as_bytes());
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::consts::TRAPDOOR_HEX_LEN;
    use crate::keys::KeyHierarchy;

    fn engine() -> CryptoEngine {
        CryptoEngine::new(Arc::new(
            KeyHierarchy::from_bytes([4; 32], [8; 16]).unwrap(),
        ))
    }

    #[test]
    fn trapdoor_is_lowercase_hex_of_fixed_length() {
        let t = engine().trapdoor("aarav").unwrap();
        assert_eq!(t.as_str().len(), TRAPDOOR_HEX_LEN);
        assert!(t
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn posting_tag_round_trips_and_binds_record() {
        let crypto = engine();
        let t = crypto.trapdoor("aarav").unwrap();
        let tag = crypto.posting_tag(&t, "20001");

        assert!(crypto.verify_posting_tag(&t, "20001", &tag));
        assert!(!crypto.verify_posting_tag(&t, "20002", &tag));
        assert!(!crypto.verify_posting_tag(&crypto.trapdoor("sharma").unwrap(), "20001", &tag));
        assert!(!crypto.verify_posting_tag(&t, "20001", &tag[..31]));
    }
}
