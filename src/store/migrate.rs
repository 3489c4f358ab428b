use crate::error::StoreError;
use crate::store::paths::StorageLocations;
use crate::store::{FamilyStore, backup};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationOutcome {
    pub files_copied: usize,
}

fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// The writable location counts as fresh only when it holds neither a family
/// file nor any stored image.
fn data_root_is_fresh(locations: &StorageLocations) -> bool {
    !locations.familias_file().exists() && !dir_has_entries(&locations.images_dir())
}

fn legacy_root(locations: &StorageLocations) -> PathBuf {
    match env::var("ALTAR_LEGACY_DIR") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => locations.bundle_root.clone(),
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<usize, StoreError> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|err| StoreError::Io(err.into()))?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// First run after an upgrade or reinstall: when the writable data root is
/// still empty and a `dados`/`imagens` tree exists beside the previous
/// install, copy it wholesale before anything else touches the store.
pub fn adopt_legacy_data(locations: &StorageLocations) -> Result<MigrationOutcome, StoreError> {
    let mut outcome = MigrationOutcome::default();
    if !data_root_is_fresh(locations) {
        return Ok(outcome);
    }

    let legacy = legacy_root(locations);
    if legacy == locations.data_root {
        return Ok(outcome);
    }

    for sub in ["dados", "imagens"] {
        let src = legacy.join(sub);
        if src.is_dir() {
            outcome.files_copied += copy_tree(&src, &locations.data_root.join(sub))?;
        }
    }
    Ok(outcome)
}

/// Take one compressed snapshot of the data directory whenever the running
/// version differs from the `version.txt` marker, then advance the marker.
/// Returns the archive path when a backup was taken.
pub fn backup_if_version_changed(
    store: &FamilyStore,
    current_version: &str,
) -> Result<Option<PathBuf>, StoreError> {
    let marker = store.locations().version_file();
    let last_seen = fs::read_to_string(&marker)
        .ok()
        .map(|s| s.trim().to_string());
    if last_seen.as_deref() == Some(current_version) {
        return Ok(None);
    }

    let archive =
        backup::create_backup(store.locations(), &store.config().backup, current_version)?;
    fs::write(&marker, format!("{current_version}\n"))?;
    Ok(Some(archive))
}
