// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing;

/// Crate-wide configuration, loaded from `<root>/config.toml` when present.
/// Every field has a default so a bare root works out of the box.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub logbook: LogbookConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl CoreConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("config.toml");
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str::<CoreConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            tracing::info!(
                "No config file found at {}. Using CoreConfig::default().",
                path.display()
            );
            CoreConfig::default()
        };
        cfg.resolve_paths(root);
        Ok(cfg)
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.logbook.path = absolutize(root, &self.logbook.path);
        self.archive.path = absolutize(root, &self.archive.path);
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            logbook: LogbookConfig::default(),
            archive: ArchiveConfig::default(),
            snapshot: SnapshotConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "SystemConfig::default_name")]
    pub name: String,
    #[serde(default = "SystemConfig::default_version")]
    pub version: String,
}

impl SystemConfig {
    fn default_name() -> String {
        "veilchain".to_string()
    }

    fn default_version() -> String {
        "0.1.0".to_string()
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            version: Self::default_version(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "LogbookConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "LogbookConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "LogbookConfig::default_preview_len")]
    pub preview_len: usize,
}

impl LogbookConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("logbook.jsonl")
    }

    fn default_enabled() -> bool {
        true
    }

    fn default_preview_len() -> usize {
        120
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            enabled: Self::default_enabled(),
            preview_len: Self::default_preview_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "ArchiveConfig::default_path")]
    pub path: PathBuf,
}

impl ArchiveConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("archive")
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Default free-text description stamped into exported snapshots.
    #[serde(default = "SnapshotConfig::default_description")]
    pub description: String,
}

impl SnapshotConfig {
    fn default_description() -> String {
        "VeilChain conversation export".to_string()
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            description: Self::default_description(),
        }
    }
}

fn absolutize(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}
