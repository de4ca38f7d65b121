// src/chain/block.rs
//! One immutable interaction record plus its integrity fields.
//!
//! The digest is computed over a *canonical* encoding: a fixed-schema JSON
//! document with a schema version tag and the block's non-`hash` fields in a
//! fixed order. Serde serializes struct fields in declaration order, so the
//! digest is a pure function of field values: two independently
//! reconstructed blocks with equal fields always hash identically.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version tag baked into every digest. Bump only with the snapshot format.
const DIGEST_SCHEMA: &str = "veilchain-digest-v1";

/// One interaction in the chain. Immutable once created; the store is the
/// only component that constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Dense position in the chain, assigned by the store.
    pub id: u64,
    /// Originator label (e.g. "human", "ai"), stored lower-cased.
    pub speaker: String,
    /// Opaque payload; hashed and stored verbatim, never interpreted.
    pub content: String,
    /// Creation instant, unix epoch milliseconds.
    pub timestamp: i64,
    /// RFC3339 rendering derived from `timestamp`.
    pub datetime: String,
    /// Hash of the block immediately before this one in append order.
    /// `None` only for the genesis block. Encodes temporal order.
    pub previous_hash: Option<String>,
    /// Id of the block this one logically replies to, if any. May point at
    /// any earlier block, not just `id - 1`. Encodes conversational lineage.
    pub parent_id: Option<u64>,
    /// SHA-256 hex over the canonical encoding of every field above.
    pub hash: String,
}

/// Fixed-schema view of a block used only for hashing. Field order here IS
/// the canonical order; changing it breaks every existing digest.
#[derive(Serialize)]
struct DigestDoc<'a> {
    schema: &'static str,
    id: u64,
    speaker: &'a str,
    content: &'a str,
    timestamp: i64,
    datetime: &'a str,
    previous_hash: Option<&'a str>,
    parent_id: Option<u64>,
}

impl Block {
    /// Build a block, stamping the current wall clock and computing its hash.
    /// Callers (the store) are responsible for id assignment and linkage.
    pub(crate) fn create(
        id: u64,
        speaker: &str,
        content: &str,
        previous_hash: Option<String>,
        parent_id: Option<u64>,
    ) -> Self {
        let now = Utc::now();
        let timestamp = now.timestamp_millis();
        let mut block = Block {
            id,
            speaker: speaker.to_lowercase(),
            content: content.to_string(),
            timestamp,
            datetime: datetime_from_millis(timestamp),
            previous_hash,
            parent_id,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the digest from the block's own fields. Equality with the
    /// stored `hash` is the tamper-evidence check.
    pub fn compute_hash(&self) -> String {
        let doc = DigestDoc {
            schema: DIGEST_SCHEMA,
            id: self.id,
            speaker: &self.speaker,
            content: &self.content,
            timestamp: self.timestamp,
            datetime: &self.datetime,
            previous_hash: self.previous_hash.as_deref(),
            parent_id: self.parent_id,
        };
        // Serializing a struct with only string/integer leaves cannot fail.
        let bytes = serde_json::to_vec(&doc).expect("digest document serializes");
        hex::encode(Sha256::digest(&bytes))
    }

    /// True when this is the genesis block (no temporal predecessor).
    pub fn is_genesis(&self) -> bool {
        self.previous_hash.is_none()
    }
}

/// RFC3339 string for an epoch-millisecond timestamp. Out-of-range values
/// (not producible by `Block::create`) render as the unix epoch.
pub(crate) fn datetime_from_millis(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(chrono::DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_reproducible() {
        let b = Block::create(0, "Human", "hello", None, None);
        assert_eq!(b.hash, b.compute_hash());
        assert_eq!(b.speaker, "human", "speaker is case-normalized");
        assert!(b.is_genesis());
    }

    #[test]
    fn any_field_change_changes_the_digest() {
        let b = Block::create(1, "ai", "hi there", Some("abc".into()), Some(0));
        let base = b.compute_hash();

        let mut content = b.clone();
        content.content.push('!');
        assert_ne!(content.compute_hash(), base);

        let mut parent = b.clone();
        parent.parent_id = None;
        assert_ne!(parent.compute_hash(), base);

        let mut link = b.clone();
        link.previous_hash = Some("abd".into());
        assert_ne!(link.compute_hash(), base);

        let mut ts = b.clone();
        ts.timestamp += 1;
        assert_ne!(ts.compute_hash(), base);
    }

    #[test]
    fn equal_fields_hash_identically() {
        let b = Block::create(0, "human", "same words", None, None);
        // Reconstruct field-for-field, as an importer would.
        let again = Block {
            id: b.id,
            speaker: b.speaker.clone(),
            content: b.content.clone(),
            timestamp: b.timestamp,
            datetime: b.datetime.clone(),
            previous_hash: b.previous_hash.clone(),
            parent_id: b.parent_id,
            hash: String::new(),
        };
        assert_eq!(again.compute_hash(), b.hash);
    }
}
