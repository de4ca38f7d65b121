// src/chain/mod.rs
//! The lineage chain engine: hash-linked blocks, the append-only store that
//! owns them, the derived parent/child index, and the snapshot codec.

pub mod block;
pub mod codec;
pub mod lineage;
pub mod store;

pub use block::Block;
pub use codec::{SnapshotMeta, FORMAT_VERSION};
pub use lineage::LineageIndex;
pub use store::ChainStore;
