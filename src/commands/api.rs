// src/commands/api.rs
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::chain::{codec, ChainStore};
use crate::config::CoreConfig;
use crate::errors::TamperDetected;
use crate::services::archivist::{Archivist, Permastore};
use crate::utils::logbook;

/// One interactive session: a single owned chain plus its collaborators.
///
/// There is no ambient global; whoever drives a conversation (CLI, UI,
/// script) holds a `Session` and passes it around. Everything a front-end
/// needs lives here: `append`, `verify`, `export`, `import`, `children_of`,
/// `roots`, plus durable publication through the configured archive.
pub struct Session {
    config: CoreConfig,
    store: ChainStore,
    archivist: Archivist,
}

impl Session {
    /// Create a session rooted at `root` (created if missing), with an empty
    /// chain. Config is read from `<root>/config.toml` when present.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating session root {}", root.display()))?;
        let config = CoreConfig::load(&root)?;
        info!(
            system = %config.system.name,
            version = %config.system.version,
            root = %root.display(),
            "session opened"
        );
        let archivist = Archivist::open(config.archive.path.clone())?;
        Ok(Self {
            config,
            store: ChainStore::new(),
            archivist,
        })
    }

    /// Record one interaction. Returns the new block id.
    pub fn append(&mut self, speaker: &str, content: &str, parent_id: Option<u64>) -> Result<u64> {
        let id = self.store.append(speaker, content, parent_id)?;
        debug!(id, parent = ?parent_id, "interaction recorded");
        self.log(
            "append",
            json!({
                "id": id,
                "speaker": speaker.to_lowercase(),
                "parent_id": parent_id,
                "content_preview": logbook::preview(content, self.config.logbook.preview_len),
            }),
        );
        Ok(id)
    }

    /// Check the whole chain for tampering. Read-only.
    pub fn verify(&self) -> Result<(), TamperDetected> {
        let outcome = self.store.verify();
        match &outcome {
            Ok(()) => {
                debug!(blocks = self.store.len(), "chain verified");
                self.log("verify_ok", json!({ "blocks": self.store.len() }));
            }
            Err(t) => {
                warn!(id = t.id, kind = %t.kind, "chain verification failed");
                self.log(
                    "verify_failed",
                    json!({ "id": t.id, "kind": t.kind.as_str() }),
                );
            }
        }
        outcome
    }

    /// Serialize the chain with the configured snapshot description.
    pub fn export(&self) -> Result<Vec<u8>> {
        let bytes = codec::export(&self.store, &self.config.snapshot.description)?;
        self.log(
            "export",
            json!({ "blocks": self.store.len(), "bytes": bytes.len() }),
        );
        Ok(bytes)
    }

    /// Replace this session's chain with a parsed snapshot. On error the
    /// current chain is left untouched. Stored hashes are preserved exactly;
    /// call `verify` afterward to judge the loaded chain.
    pub fn import(&mut self, bytes: &[u8]) -> Result<()> {
        let store = codec::import(bytes)?;
        info!(blocks = store.len(), "snapshot loaded, chain replaced");
        self.log("import", json!({ "blocks": store.len() }));
        self.store = store;
        Ok(())
    }

    /// Ids of blocks replying to `id`, oldest first.
    pub fn children_of(&self, id: u64) -> &[u64] {
        self.store.children_of(id)
    }

    /// Ids of blocks with no logical parent.
    pub fn roots(&self) -> &[u64] {
        self.store.roots()
    }

    /// Read access to the underlying chain.
    pub fn store(&self) -> &ChainStore {
        &self.store
    }

    /// Export the chain and persist it through the archive. Returns the
    /// opaque reference that retrieves it later.
    pub fn publish(&self) -> Result<String> {
        let bytes = self.export()?;
        let reference = self
            .archivist
            .publish(&bytes)
            .context("publishing snapshot")?;
        info!(reference = %reference, "snapshot published");
        self.log("publish", json!({ "reference": reference }));
        Ok(reference)
    }

    /// Fetch a published snapshot by reference and load it, replacing the
    /// current chain. The loaded chain is reported as-is; verification stays
    /// an explicit follow-up step.
    pub fn fetch_published(&mut self, reference: &str) -> Result<()> {
        let bytes = self
            .archivist
            .fetch(reference)
            .with_context(|| format!("fetching published snapshot {}", reference))?;
        self.import(&bytes)?;
        self.log("fetch_published", json!({ "reference": reference }));
        Ok(())
    }

    /// Human-readable chain summary, one entry per block.
    pub fn render_chain(&self) -> String {
        let mut out = String::new();
        for block in self.store.iter() {
            let prev = match &block.previous_hash {
                Some(h) => format!("{}...", &h[..h.len().min(12)]),
                None => "Genesis".to_string(),
            };
            let _ = writeln!(
                out,
                "ID {} | {}: {}",
                block.id,
                block.speaker.to_uppercase(),
                block.content
            );
            let _ = writeln!(
                out,
                "   Hash: {}... | Prev: {}\n",
                &block.hash[..block.hash.len().min(16)],
                prev
            );
        }
        out
    }

    fn log(&self, event: &str, data: serde_json::Value) {
        if !self.config.logbook.enabled {
            return;
        }
        logbook::emit_event(
            &self.config.logbook.path,
            event,
            data,
            &Utc::now().to_rfc3339(),
        );
    }
}
