pub mod add;
pub mod backup;
pub mod draw;
pub mod edit;
pub mod list;
pub mod mark_all;
pub mod remove;
pub mod reset;
pub mod set_drawn;
pub mod status;
pub mod validate;

use crate::store::paths::StorageLocations;
use crate::store::{FamilyStore, config, migrate, warn};
use anyhow::{Context, Result};
use serde::Serialize;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

/// One process start equals one session: resolve locations, load config,
/// open the store (which adopts legacy data), and take the version-change
/// auto backup. The backup is best-effort; a full disk must not block the
/// operator.
pub fn open_store() -> Result<FamilyStore> {
    let locations = StorageLocations::resolve().context("failed to resolve storage locations")?;
    let config = config::load_config(&locations).context("failed to load configuration")?;
    let data_root = locations.data_root.clone();
    let store = FamilyStore::open(locations, config)
        .with_context(|| format!("failed to open data store at {}", data_root.display()))?;

    if let Err(err) = migrate::backup_if_version_changed(&store, APP_VERSION) {
        warn::emit(
            "AUTO_BACKUP_FAILED",
            "open",
            &store.locations().backups_dir().display().to_string(),
            &err.to_string(),
        );
    }
    Ok(store)
}
