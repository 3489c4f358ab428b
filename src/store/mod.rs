pub mod atomic;
pub mod backup;
pub mod config;
pub mod draw;
pub mod family;
pub mod images;
pub mod migrate;
pub mod paths;
pub mod validate;
pub mod warn;

use crate::error::StoreError;
use crate::store::config::StoreConfig;
use crate::store::family::Family;
use crate::store::paths::StorageLocations;

/// Handle over the persisted roster and raffle state. Constructed once at
/// process start and passed by reference to collaborators; the in-memory
/// caches are the source of truth for the session and refresh from disk only
/// on `force_reload` or after the store's own writes.
///
/// Single process, single session: there is no locking and no cross-process
/// coordination.
pub struct FamilyStore {
    pub(crate) locations: StorageLocations,
    pub(crate) config: StoreConfig,
    pub(crate) families_cache: Option<Vec<Family>>,
    pub(crate) last_drawn_cache: Option<Option<u32>>,
}

impl FamilyStore {
    /// Create the directory layout, adopt any legacy data tree found beside a
    /// previous install, and return a store with cold caches. Legacy adoption
    /// failures are absorbed: an upgrade must never prevent startup.
    pub fn open(locations: StorageLocations, config: StoreConfig) -> Result<Self, StoreError> {
        locations.ensure_layout()?;
        if let Err(err) = migrate::adopt_legacy_data(&locations) {
            warn::emit(
                "LEGACY_ADOPTION_FAILED",
                "open",
                &locations.data_root.display().to_string(),
                &err.to_string(),
            );
        }
        Ok(Self {
            locations,
            config,
            families_cache: None,
            last_drawn_cache: None,
        })
    }

    pub fn locations(&self) -> &StorageLocations {
        &self.locations
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
