// src/chain/lineage.rs
//! Parent → children adjacency over the chain.
//!
//! A pure projection of the blocks' `parent_id` fields: never authoritative,
//! rebuilt wholesale on import and extended one entry at a time on append.
//! Answers "what replied to block X" and "which blocks start a thread"
//! without rescanning the store.

use std::collections::BTreeMap;

use crate::chain::block::Block;

#[derive(Debug, Clone, Default)]
pub struct LineageIndex {
    /// parent id -> child ids, in insertion (append) order.
    children: BTreeMap<u64, Vec<u64>>,
    /// Blocks with no logical parent, in append order.
    roots: Vec<u64>,
}

impl LineageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the whole index from a block sequence. O(n); used on load,
    /// where the old index is discarded rather than patched.
    pub fn rebuild(blocks: &[Block]) -> Self {
        let mut idx = Self::new();
        for b in blocks {
            idx.record(b.id, b.parent_id);
        }
        idx
    }

    /// Register one freshly appended block. O(1) amortized. The store has
    /// already validated that `parent_id`, when present, exists.
    pub(crate) fn record(&mut self, id: u64, parent_id: Option<u64>) {
        match parent_id {
            Some(p) => self.children.entry(p).or_default().push(id),
            None => self.roots.push(id),
        }
    }

    /// Ids of blocks that reply to `id`, oldest first. Empty for unknown ids.
    pub fn children_of(&self, id: u64) -> &[u64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of blocks with no logical parent, oldest first.
    pub fn roots(&self) -> &[u64] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_matches_incremental_recording() {
        let mut incremental = LineageIndex::new();
        let parents = [None, Some(0), Some(0), Some(2), None];
        for (id, p) in parents.iter().enumerate() {
            incremental.record(id as u64, *p);
        }

        assert_eq!(incremental.children_of(0), &[1, 2]);
        assert_eq!(incremental.children_of(2), &[3]);
        assert_eq!(incremental.children_of(1), &[] as &[u64]);
        assert_eq!(incremental.roots(), &[0, 4]);
    }
}
