// src/lib.rs
//! VeilChain: a tamper-evident record of human-AI conversation.
//!
//! Each interaction becomes an immutable [`Block`] whose hash is bound to its
//! content and to the block before it, while a separate `parent_id` graph
//! tracks who replied to whom: temporal order and conversational lineage are
//! distinct structures. Any holder of an exported snapshot can re-verify the
//! whole record and rebuild the branching structure independently.
//!
//! Layering:
//! - [`chain`]: the engine with blocks, the append-only store, the lineage
//!   index, and the snapshot codec. Pure in-memory computation, typed errors.
//! - [`services`]: the durable-publication collaborator (content-addressed
//!   archive behind the [`services::Permastore`] trait).
//! - [`commands`]: the per-session facade front-ends talk to.
//!
//! ```no_run
//! use veilchain::chain::ChainStore;
//!
//! let mut chain = ChainStore::new();
//! let a = chain.append("human", "hello", None).unwrap();
//! let b = chain.append("ai", "hi there", Some(a)).unwrap();
//! assert_eq!(chain.children_of(a), &[b]);
//! assert!(chain.verify().is_ok());
//! ```

pub mod chain;
pub mod commands;
pub mod config;
pub mod errors;
pub mod services;
pub mod utils;

pub use chain::{Block, ChainStore, LineageIndex};
pub use commands::Session;
pub use errors::{ChainError, SnapshotError, TamperDetected, TamperKind};
