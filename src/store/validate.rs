use crate::store::family::{Family, coerce_record};
use crate::store::{FamilyStore, atomic, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// What a validation pass did to the family file. `ok` mirrors the original
/// contract: true only when the corrected roster was written back (or there
/// was nothing to validate).
#[derive(Debug, Clone, Copy, Default)]
pub struct FamilyValidationOutcome {
    pub ok: bool,
    pub scanned: usize,
    pub kept: usize,
    pub dropped: usize,
    pub repaired: usize,
    pub thumbnails_created: usize,
}

fn backup_corrupt_file(file: &Path) {
    let backup = file.with_extension("json.bak");
    if let Err(err) = fs::copy(file, &backup) {
        warn::emit(
            "CORRUPT_BACKUP_FAILED",
            "validate",
            &file.display().to_string(),
            &err.to_string(),
        );
    }
}

impl FamilyStore {
    /// Scan the persisted roster for structural damage and repair it in
    /// place. An unreadable or non-array file is preserved as a `.bak` copy
    /// and replaced with an empty roster (`ok = false`). Otherwise each
    /// record is coerced or dropped per the `coerce_record` policy, the
    /// corrected list is written back atomically, and missing thumbnails are
    /// regenerated for records with a live photo.
    ///
    /// Idempotent: on healthy data a second run rewrites byte-identical
    /// output and touches no other file.
    pub fn validate_families(&mut self) -> FamilyValidationOutcome {
        let mut outcome = FamilyValidationOutcome::default();
        let file = self.locations.familias_file();
        if !file.exists() {
            outcome.ok = true;
            return outcome;
        }

        let parsed: Option<Vec<Value>> = fs::read_to_string(&file)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|value| match value {
                Value::Array(items) => Some(items),
                _ => None,
            });
        let Some(raw_records) = parsed else {
            warn::emit(
                "FAMILIES_FILE_CORRUPT",
                "validate",
                &file.display().to_string(),
                "unreadable or not a JSON array",
            );
            backup_corrupt_file(&file);
            let empty: Vec<Family> = Vec::new();
            if let Err(err) = atomic::write_json_atomic(&file, &empty) {
                warn::emit(
                    "FAMILIES_RESET_FAILED",
                    "validate",
                    &file.display().to_string(),
                    &err.to_string(),
                );
            }
            self.families_cache = Some(Vec::new());
            return outcome;
        };

        let mut corrected: Vec<Family> = Vec::with_capacity(raw_records.len());
        for raw in &raw_records {
            outcome.scanned += 1;
            match coerce_record(raw, &self.locations) {
                Some(family) => {
                    let unchanged = serde_json::to_value(&family)
                        .map(|v| v == *raw)
                        .unwrap_or(false);
                    if !unchanged {
                        outcome.repaired += 1;
                    }
                    corrected.push(family);
                    outcome.kept += 1;
                }
                None => outcome.dropped += 1,
            }
        }

        match atomic::write_json_atomic(&file, &corrected) {
            Ok(()) => outcome.ok = true,
            Err(err) => {
                warn::emit(
                    "FAMILIES_WRITEBACK_FAILED",
                    "validate",
                    &file.display().to_string(),
                    &err.to_string(),
                );
                return outcome;
            }
        }
        self.families_cache = Some(corrected.clone());

        for family in &corrected {
            if family.foto.is_empty() {
                continue;
            }
            let Some(file_name) = Path::new(&family.foto)
                .file_name()
                .and_then(|n| n.to_str())
            else {
                continue;
            };
            let photo = self.locations.images_dir().join(file_name);
            if !photo.is_file() {
                continue;
            }
            if self.locations.thumbnail_path(file_name).exists() {
                continue;
            }
            self.write_thumbnail(&photo);
            outcome.thumbnails_created += 1;
        }

        outcome
    }

    /// Cross-check the last-drawn pointer against the roster, repairing it by
    /// recomputation when it is stale or garbled. Never blocks startup: the
    /// answer is always `true` once the repair has been attempted.
    pub fn validate_draw(&mut self) -> bool {
        if !self.locations.sorteio_file().exists() {
            return true;
        }
        self.last_drawn(true);
        true
    }

    /// Startup integrity pass over both files. A `false` result means
    /// "proceed with best-effort state", not a fatal condition.
    pub fn run_startup_checks(&mut self) -> bool {
        let families_ok = self.validate_families().ok;
        let draw_ok = self.validate_draw();
        families_ok && draw_ok
    }
}
