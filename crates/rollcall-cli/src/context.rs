use anyhow::{Context as AnyhowContext, Result};
use std::path::{Path, PathBuf};

use rollcall_core::{RollcallConfig, Roster};

use crate::services::StorageService;

/// Application context passed to the shell: configuration, the storage
/// service, and the roster loaded from it at startup.
pub struct Context {
    pub config: RollcallConfig,
    pub storage: StorageService,
    pub roster: Roster,
}

impl Context {
    /// Build the context. Data-file precedence: CLI flag, then
    /// ROLLCALL_DATA_FILE (applied inside config loading), then the config
    /// file, then "roster.json".
    pub fn new(config_path: &Path, data_file: Option<PathBuf>) -> Result<Self> {
        let config = RollcallConfig::load(Some(config_path))
            .with_context(|| format!("failed to load config from {}", config_path.display()))?;

        let data_path = data_file
            .or_else(|| config.storage.data_file.clone().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("roster.json"));

        let storage = StorageService::new(data_path);
        let roster = storage.load()?;

        Ok(Self {
            config,
            storage,
            roster,
        })
    }
}
