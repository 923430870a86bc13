use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the persistent entity store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the store directory
    pub path: PathBuf,

    /// Maximum map size for LMDB (in bytes)
    /// Default: 1GB
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Sync mode for durability
    #[serde(default)]
    pub sync_mode: SyncMode,
}

/// Durability mode for commits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Flush data and metadata on every commit
    #[default]
    Full,
    /// Skip the metadata flush; the last commit may be lost on crash
    NoMetaSync,
    /// No fsync at all; a replay from scratch is required after a crash
    NoSync,
}

fn default_map_size() -> usize {
    1024 * 1024 * 1024 // 1GB
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            map_size: default_map_size(),
            sync_mode: SyncMode::default(),
        }
    }
}
