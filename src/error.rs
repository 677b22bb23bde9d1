// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("record identifier already present: {0}")]
    DuplicateIdentifier(String),

    /// Stored ciphertext failed verification: tampering or corruption, never "not found"
    #[error("stored record failed authentication")]
    AuthenticationFailure,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("search index integrity check failed: {0}")]
    IndexTampered(String),
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Configuration(err.to_string())
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
