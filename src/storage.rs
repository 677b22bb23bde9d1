// src/storage.rs
//! Storage engine: encrypted records plus a blind index of trapdoor postings
//!
//! `insert` encrypts, derives one trapdoor per distinct term and hands the
//! whole unit to `commit_record`. `search` maps a term to its trapdoor, joins
//! postings against records in one statement and decrypts every hit.
//!
//! The engine owns its connection behind a mutex so one instance can be
//! shared across threads; separate instances (or processes) on the same file
//! are serialized by SQLite's write lock.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::config::Config;
use crate::consts::DEFAULT_BUSY_TIMEOUT_MS;
use crate::crypto::CryptoEngine;
use crate::db::records_db_ops::{
    commit_record, for_each_posting, lookup_postings, record_count, record_exists,
};
use crate::db::{open_records_db, open_records_db_in_memory, PendingPosting, PendingRecord};
use crate::error::{CoreError, CoreResult};
use crate::record::{normalize_term, Record};

#[derive(Debug, Clone)]
pub struct StorageOptions {
    /// Tag every posting under the index-integrity key and check tags on search
    pub integrity_tags: bool,
    pub busy_timeout: Duration,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            integrity_tags: false,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl From<&Config> for StorageOptions {
    fn from(config: &Config) -> Self {
        Self {
            integrity_tags: config.index.integrity_tags,
            busy_timeout: Duration::from_millis(config.storage.busy_timeout_ms),
        }
    }
}

pub struct StorageEngine {
    conn: Mutex<Connection>,
    crypto: CryptoEngine,
    options: StorageOptions,
}

impl StorageEngine {
    pub fn open<P: AsRef<Path>>(
        path: P,
        crypto: CryptoEngine,
        options: StorageOptions,
    ) -> CoreResult<Self> {
        let conn = open_records_db(path, options.busy_timeout)?;
        Ok(Self::with_connection(conn, crypto, options))
    }

    pub fn open_in_memory(crypto: CryptoEngine, options: StorageOptions) -> CoreResult<Self> {
        let conn = open_records_db_in_memory()?;
        Ok(Self::with_connection(conn, crypto, options))
    }

    fn with_connection(conn: Connection, crypto: CryptoEngine, options: StorageOptions) -> Self {
        Self {
            conn: Mutex::new(conn),
            crypto,
            options,
        }
    }

    pub fn crypto(&self) -> &CryptoEngine {
        &self.crypto
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    /// An uncommitted transaction rolls back on drop, so a poisoned
    /// connection is still consistent
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encrypt and index `record`; returns its identifier
    pub fn insert(&self, record: &Record) -> CoreResult<String> {
        record.validate()?;
        let id = record.id().to_owned();

        let blob = self.crypto.encrypt_record(record)?;
        let postings = record
            .index_terms()
            .iter()
            .map(|term| {
                let trapdoor = self.crypto.trapdoor(term)?;
                let tag = self
                    .options
                    .integrity_tags
                    .then(|| self.crypto.posting_tag(&trapdoor, &id));
                Ok(PendingPosting { trapdoor, tag })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        let posting_count = postings.len();

        let pending = PendingRecord {
            id: id.clone(),
            blob,
            postings,
        };

        match commit_record(&mut self.lock(), &pending) {
            Ok(()) => {
                debug!(record_id = %id, postings = posting_count, "record inserted");
                Ok(id)
            }
            Err(err @ CoreError::DuplicateIdentifier(_)) => {
                warn!(record_id = %id, "insert rejected: duplicate identifier");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Every record indexed under `term`, decrypted; empty when nothing matches
    pub fn search(&self, term: &str) -> CoreResult<Vec<Record>> {
        if normalize_term(term).is_empty() {
            return Ok(Vec::new());
        }

        let trapdoor = self.crypto.trapdoor(term)?;
        let hits = lookup_postings(&self.lock(), &trapdoor)?;

        let mut records = Vec::with_capacity(hits.len());
        for hit in hits {
            if self.options.integrity_tags {
                let verified = hit.tag.as_deref().is_some_and(|tag| {
                    self.crypto
                        .verify_posting_tag(&trapdoor, &hit.record_id, tag)
                });
                if !verified {
                    warn!(record_id = %hit.record_id, "posting failed integrity check");
                    return Err(CoreError::IndexTampered(format!(
                        "posting for record {} failed verification",
                        hit.record_id
                    )));
                }
            }

            let record = self.crypto.decrypt_record(&hit.blob).map_err(|err| {
                warn!(record_id = %hit.record_id, error = %err, "stored record failed to decrypt");
                err
            })?;

            // A valid blob copied under another identifier still authenticates
            if record.id() != hit.record_id {
                warn!(record_id = %hit.record_id, "stored record belongs to another identifier");
                return Err(CoreError::AuthenticationFailure);
            }
            records.push(record);
        }

        debug!(matches = records.len(), "search complete");
        Ok(records)
    }

    pub fn contains(&self, id: &str) -> CoreResult<bool> {
        Ok(record_exists(&self.lock(), id)?)
    }

    pub fn record_count(&self) -> CoreResult<u64> {
        Ok(record_count(&self.lock())?)
    }

    /// Check every posting's integrity tag; returns how many were verified
    pub fn verify_index(&self) -> CoreResult<usize> {
        if !self.options.integrity_tags {
            return Err(CoreError::Configuration(
                "index verification requires integrity tags".into(),
            ));
        }

        let conn = self.lock();
        let verified = for_each_posting(&conn, |trapdoor, record_id, tag| {
            match tag {
                Some(tag) if self.crypto.verify_posting_tag(&trapdoor, &record_id, &tag) => Ok(()),
                _ => Err(CoreError::IndexTampered(format!(
                    "posting for record {record_id} failed verification"
                ))),
            }
        })?;

        debug!(postings = verified, "index verified");
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::keys::KeyHierarchy;

    fn engine(options: StorageOptions) -> StorageEngine {
        let keys = Arc::new(KeyHierarchy::from_bytes([3; 32], [6; 16]).unwrap());
        StorageEngine::open_in_memory(CryptoEngine::new(keys), options).unwrap()
    }

    #[test]
    fn blank_query_returns_nothing() {
        let engine = engine(StorageOptions::default());
        engine
            .insert(&Record::new("id", "1").with_field("name", "Kabir Singh"))
            .unwrap();

        assert!(engine.search("").unwrap().is_empty());
        assert!(engine.search("   ").unwrap().is_empty());
    }

    #[test]
    fn multi_word_query_is_a_single_term() {
        let engine = engine(StorageOptions::default());
        engine
            .insert(&Record::new("id", "1").with_field("name", "Kabir Singh"))
            .unwrap();

        assert!(engine.search("Kabir Singh").unwrap().is_empty());
        assert_eq!(engine.search("singh").unwrap().len(), 1);
    }

    #[test]
    fn verify_index_needs_integrity_tags() {
        let engine = engine(StorageOptions::default());
        assert!(matches!(
            engine.verify_index(),
            Err(CoreError::Configuration(_))
        ));
    }

    #[test]
    fn empty_identifier_is_rejected_before_storage() {
        let engine = engine(StorageOptions::default());
        let err = engine
            .insert(&Record::new("id", "").with_field("name", "Nobody"))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecord(_)));
        assert_eq!(engine.record_count().unwrap(), 0);
    }
}
