// src/keys/material.rs
//! Root secret and global salt: the only key material that ever touches disk
//!
//! Both files are created once with a create-if-absent publish: the fresh
//! bytes go to a temp file in the key directory, which is then hard-linked
//! into place with `persist_noclobber`. Concurrent initializers race on that
//! link; exactly one wins and everyone else reads the winner's bytes.

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use rand::RngCore;
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::consts::{GLOBAL_SALT_FILE, GLOBAL_SALT_LEN, ROOT_SECRET_FILE, ROOT_SECRET_LEN};
use crate::error::{CoreError, CoreResult};

/// 256-bit root secret: zeroized on drop, never logged
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RootSecret([u8; ROOT_SECRET_LEN]);

impl RootSecret {
    pub fn from_bytes(bytes: [u8; ROOT_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    pub fn random() -> Self {
        let mut bytes = [0u8; ROOT_SECRET_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn expose_secret(&self) -> &[u8; ROOT_SECRET_LEN] {
        &self.0
    }
}

impl fmt::Debug for RootSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootSecret([REDACTED])")
    }
}

/// 128-bit salt mixed into every trapdoor
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct GlobalSalt([u8; GLOBAL_SALT_LEN]);

impl GlobalSalt {
    pub fn from_bytes(bytes: [u8; GLOBAL_SALT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn random() -> Self {
        let mut bytes = [0u8; GLOBAL_SALT_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; GLOBAL_SALT_LEN] {
        &self.0
    }
}

impl fmt::Debug for GlobalSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalSalt({})", hex::encode(self.0))
    }
}

/// Root secret + global salt as loaded from (or freshly written to) a key directory
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub root: RootSecret,
    pub salt: GlobalSalt,
}

impl KeyMaterial {
    /// Load both files from `key_dir`, generating whichever is missing
    pub fn load_or_create<P: AsRef<Path>>(key_dir: P) -> CoreResult<Self> {
        let key_dir = key_dir.as_ref();
        fs::create_dir_all(key_dir)?;

        let root = load_or_create_fixed::<ROOT_SECRET_LEN>(&key_dir.join(ROOT_SECRET_FILE))?;
        let salt = load_or_create_fixed::<GLOBAL_SALT_LEN>(&key_dir.join(GLOBAL_SALT_FILE))?;

        Ok(Self {
            root: RootSecret::from_bytes(*root),
            salt: GlobalSalt::from_bytes(*salt),
        })
    }

    /// Load both files; fails if either is absent
    pub fn load<P: AsRef<Path>>(key_dir: P) -> CoreResult<Self> {
        let key_dir = key_dir.as_ref();
        let root = read_fixed::<ROOT_SECRET_LEN>(&key_dir.join(ROOT_SECRET_FILE))?;
        let salt = read_fixed::<GLOBAL_SALT_LEN>(&key_dir.join(GLOBAL_SALT_FILE))?;

        Ok(Self {
            root: RootSecret::from_bytes(*root),
            salt: GlobalSalt::from_bytes(*salt),
        })
    }
}

/// Read a raw key file that must be exactly `N` bytes long
fn read_fixed<const N: usize>(path: &Path) -> CoreResult<Zeroizing<[u8; N]>> {
    let raw = Zeroizing::new(fs::read(path)?);
    if raw.len() != N {
        return Err(CoreError::Configuration(format!(
            "{} is {} bytes, expected {N}",
            path.display(),
            raw.len()
        )));
    }

    let mut out = Zeroizing::new([0u8; N]);
    out.copy_from_slice(&raw);
    Ok(out)
}

fn load_or_create_fixed<const N: usize>(path: &Path) -> CoreResult<Zeroizing<[u8; N]>> {
    match read_fixed::<N>(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), "loaded key material");
            return Ok(bytes);
        }
        Err(CoreError::Io(err)) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }

    let mut fresh = Zeroizing::new([0u8; N]);
    rand::rng().fill_bytes(fresh.as_mut_slice());

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".erv-key-")
        .tempfile_in(dir)?;
    tmp.write_all(fresh.as_slice())?;
    tmp.as_file().sync_all()?;

    match tmp.persist_noclobber(path) {
        Ok(_) => {
            info!(path = %path.display(), len = N, "generated new key material");
            Ok(fresh)
        }
        // Lost the race: another initializer published first
        Err(err) if err.error.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %path.display(), "key material created concurrently, loading");
            read_fixed::<N>(path)
        }
        Err(err) => Err(CoreError::Io(err.error)),
    }
}
