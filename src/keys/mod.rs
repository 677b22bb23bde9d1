// src/keys/mod.rs
//! Key hierarchy: one persisted root secret + salt, three derived purpose keys
mod hierarchy;
mod material;

pub use hierarchy::{derive_key, DerivedKey, KeyHierarchy};
pub use material::{GlobalSalt, KeyMaterial, RootSecret};
