// src/chain/codec.rs
//! Snapshot export/import: the one data contract this engine has with the
//! outside world. Shape:
//!
//! ```json
//! {
//!   "metadata": { "format_version": 1, "description": "...", "exported_at": "..." },
//!   "chain": [ { "id": 0, "speaker": "...", ... , "hash": "..." }, ... ]
//! }
//! ```
//!
//! Export is pure serialization. Import reconstructs blocks exactly as
//! received; stored hashes and links are trusted as given and only re-derived
//! by an explicit `verify()` call afterward, so tampering introduced in
//! transit stays detectable instead of being silently "fixed". Import rejects
//! malformed shape outright; it never partially populates a store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::block::Block;
use crate::chain::store::ChainStore;
use crate::errors::SnapshotError;

/// Version of the snapshot envelope this build reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Envelope carried alongside the block sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub format_version: u32,
    /// Free-text label chosen by the exporter.
    pub description: String,
    /// RFC3339 instant the snapshot was produced.
    pub exported_at: String,
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    metadata: SnapshotMeta,
    chain: Vec<Block>,
}

/// Serialize the store to transportable bytes. No side effects on the store;
/// re-importing the result reproduces every block field-for-field.
pub fn export(store: &ChainStore, description: &str) -> Result<Vec<u8>, SnapshotError> {
    let file = SnapshotFile {
        metadata: SnapshotMeta {
            format_version: FORMAT_VERSION,
            description: description.to_string(),
            exported_at: Utc::now().to_rfc3339(),
        },
        chain: store.iter().cloned().collect(),
    };
    debug!(blocks = store.len(), "export snapshot");
    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Parse snapshot bytes into a fresh store, replacing nothing until the whole
/// input is accepted.
///
/// Shape checks only: valid JSON with all required fields, a supported
/// `format_version`, ids dense from 0, parents strictly backward. Hash and
/// link integrity are deliberately left to `verify()`.
pub fn import(bytes: &[u8]) -> Result<ChainStore, SnapshotError> {
    let file: SnapshotFile = serde_json::from_slice(bytes)?;
    if file.metadata.format_version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: file.metadata.format_version,
            expected: FORMAT_VERSION,
        });
    }

    for (index, block) in file.chain.iter().enumerate() {
        if block.id != index as u64 {
            return Err(SnapshotError::MalformedBlock {
                index,
                reason: format!("id {} does not match position {}", block.id, index),
            });
        }
        if let Some(p) = block.parent_id {
            if p >= block.id {
                return Err(SnapshotError::MalformedBlock {
                    index,
                    reason: format!("parent_id {} does not point strictly backward", p),
                });
            }
        }
    }

    debug!(blocks = file.chain.len(), "import snapshot");
    Ok(ChainStore::from_blocks(file.chain))
}
