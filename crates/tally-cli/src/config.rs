//! Config file handling

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tally::prelude::*;

const DEFAULT_DB_PATH: &str = "./data";

/// Contents of the `--config` file; every section is optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    store: Option<StoreConfig>,
    #[serde(default)]
    projector: ProjectorConfig,
}

/// Resolved settings: command-line flags win over the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreConfig,
    pub projector: ProjectorConfig,
}

impl Settings {
    pub fn load(
        config_path: Option<&Path>,
        db_path: Option<PathBuf>,
        fee_pool: Option<Address>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str::<ConfigFile>(&raw)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => ConfigFile::default(),
        };

        let mut store = file
            .store
            .unwrap_or_else(|| StoreConfig::new(DEFAULT_DB_PATH));
        if let Some(path) = db_path {
            store.path = path;
        }

        let mut projector = file.projector;
        if let Some(address) = fee_pool {
            projector.fee_pool_address = Some(address);
        }

        tracing::debug!(path = %store.path.display(), ?projector, "Resolved settings");
        Ok(Self { store, projector })
    }

    pub fn open_db(&self) -> Result<TallyDb> {
        TallyDb::open_with_config(self.store.clone(), self.projector.clone())
            .with_context(|| format!("Failed to open store at {}", self.store.path.display()))
    }
}
