// src/config/mod.rs
//! Configuration system for encrypted-record-vault
//!
//! TOML file + env overrides, returned as a plain value. Nothing here is
//! global: callers load a `Config` once and pass it to `open_vault`.

pub use app::{load, Config, Index, Paths, Storage};

mod app;
mod defaults;
