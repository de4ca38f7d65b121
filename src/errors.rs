// src/errors.rs
//! Typed failure results for the chain engine.
//!
//! Every failure here is a normal, recoverable result: nothing panics, nothing
//! mutates the store partially. The facade layer wraps these in `anyhow` with
//! context; the engine itself stays fully typed.

use thiserror::Error;

/// Errors from mutating the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// `append` was given a parent that does not reference an existing block.
    /// The store is left untouched.
    #[error("invalid parent id {parent_id}: chain has {len} block(s)")]
    InvalidParent { parent_id: u64, len: u64 },
}

/// The kind of integrity violation `verify` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TamperKind {
    /// `previous_hash` does not match the stored hash of the prior block
    /// (or the genesis block carries one at all).
    BrokenLink,
    /// Recomputing the block's digest from its fields does not reproduce
    /// the stored `hash`.
    HashMismatch,
}

impl TamperKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TamperKind::BrokenLink => "broken_link",
            TamperKind::HashMismatch => "hash_mismatch",
        }
    }
}

impl std::fmt::Display for TamperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First integrity violation found while walking the chain.
///
/// There is no repair path: a failed verification is terminal for that
/// snapshot and the caller's remedy is to load a trusted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tamper detected at block {id}: {kind}")]
pub struct TamperDetected {
    /// Id of the first offending block.
    pub id: u64,
    pub kind: TamperKind,
}

/// Errors from parsing an exported snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot format version {found} (this build reads version {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A block that no well-formed store could have produced: ids must be
    /// dense from 0 and parents must point strictly backward. Hash and link
    /// integrity are deliberately NOT checked here; that is `verify`'s job.
    #[error("malformed block at index {index}: {reason}")]
    MalformedBlock { index: usize, reason: String },
}
