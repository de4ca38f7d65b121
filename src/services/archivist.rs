// src/services/archivist.rs
//! Archivist: content-addressed durable storage for exported snapshots.
//!
//! The engine never cares where snapshot bytes live; it hands a fully
//! buffered blob to a `Permastore` and gets back an opaque reference string,
//! or hands a reference back and gets the original bytes. The filesystem
//! implementation here stores blobs under `<root>/<cid>` with
//! `cid = sha256(bytes)` hex, written once (idempotent).

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Durable-publication collaborator: opaque bytes in, opaque reference out.
/// Implementations must treat the bytes as a sealed blob and the reference
/// as structure-free.
pub trait Permastore {
    /// Persist `bytes` and return a reference that later retrieves them.
    fn publish(&self, bytes: &[u8]) -> Result<String>;
    /// Retrieve previously published bytes. Unknown references are errors.
    fn fetch(&self, reference: &str) -> Result<Vec<u8>>;
}

/// Filesystem-backed content store.
#[derive(Debug, Clone)]
pub struct Archivist {
    /// Directory where blobs are written by cid.
    root: PathBuf,
}

impl Archivist {
    // Per-object size cap to avoid disk exhaustion from a single write.
    // Serialized conversation chains fall well below this.
    const MAX_OBJECT_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

    /// Initialize the archive root (idempotent).
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating archive root {}", root.display()))?;
        Ok(Self { root })
    }
}

impl Permastore for Archivist {
    fn publish(&self, bytes: &[u8]) -> Result<String> {
        if bytes.len() > Self::MAX_OBJECT_BYTES {
            bail!(
                "snapshot too large to publish: {} bytes (max {})",
                bytes.len(),
                Self::MAX_OBJECT_BYTES
            );
        }
        let cid = hex::encode(Sha256::digest(bytes));

        // Write object once (idempotent).
        let path = self.root.join(&cid);
        if !path.exists() {
            fs::write(&path, bytes)
                .with_context(|| format!("writing archive object {}", path.display()))?;
        }
        debug!(cid = %cid, bytes = bytes.len(), "published snapshot");
        Ok(cid)
    }

    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self.root.join(reference);
        let meta = fs::metadata(&path)
            .with_context(|| format!("snapshot not found for reference {}", reference))?;
        if meta.len() > Self::MAX_OBJECT_BYTES as u64 {
            bail!(
                "archived object too large to fetch safely: {} bytes (max {})",
                meta.len(),
                Self::MAX_OBJECT_BYTES
            );
        }
        let bytes = fs::read(&path)
            .with_context(|| format!("reading archive object {}", path.display()))?;
        debug!(cid = %reference, bytes = bytes.len(), "fetched snapshot");
        Ok(bytes)
    }
}
