use crate::error::StoreError;
use crate::store::draw::{DRAW_DATE_FORMAT, is_valid_draw_date};
use crate::store::paths::{PHOTO_PREFIX, StorageLocations};
use crate::store::{FamilyStore, atomic, warn};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One registered family. `id` is the stable identity; `numero` is the raffle
/// ticket, unique among active families and reshuffled only by a full reset.
/// Field names double as the persisted JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: u64,
    pub numero: u32,
    pub nome: String,
    #[serde(default)]
    pub foto: String,
    #[serde(default)]
    pub sorteado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sorteio: Option<String>,
}

pub fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Rewrite a photo reference to the canonical relative form: forward slashes,
/// no data-root prefix. Anything unrecognizable is passed through for the
/// validator to judge.
pub fn normalize_foto(raw: &str, locations: &StorageLocations) -> String {
    let slashed = raw.trim().replace('\\', "/");
    if slashed.is_empty() {
        return String::new();
    }
    let root = locations.data_root.to_string_lossy().replace('\\', "/");
    let prefix = format!("{}/", root.trim_end_matches('/'));
    match slashed.strip_prefix(&prefix) {
        Some(relative) => relative.to_string(),
        None => slashed,
    }
}

fn is_valid_foto(foto: &str) -> bool {
    foto.starts_with(PHOTO_PREFIX) && has_accepted_extension(Path::new(foto))
}

fn coerce_numero(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Schema-validating coercion of one raw persisted record.
///
/// Drop policy: a record without a parseable `numero` or a non-blank `nome`
/// cannot be repaired into a guess and yields `None`. Everything else is
/// coerced: an off-root or wrong-extension `foto` is blanked, a malformed
/// `data_sorteio` is cleared, a non-boolean `sorteado` becomes `false`, and a
/// missing `id` defaults to the record's `numero`.
pub fn coerce_record(raw: &Value, locations: &StorageLocations) -> Option<Family> {
    let numero = coerce_numero(raw.get("numero")?)?;
    let nome = raw.get("nome")?.as_str()?.trim().to_string();
    if nome.is_empty() {
        return None;
    }

    let foto = raw
        .get("foto")
        .and_then(Value::as_str)
        .map(|s| normalize_foto(s, locations))
        .filter(|s| is_valid_foto(s))
        .unwrap_or_default();
    let sorteado = raw.get("sorteado").and_then(Value::as_bool).unwrap_or(false);
    let data_sorteio = if sorteado {
        raw.get("data_sorteio")
            .and_then(Value::as_str)
            .filter(|s| is_valid_draw_date(s))
            .map(str::to_string)
    } else {
        None
    };
    let id = raw.get("id").and_then(Value::as_u64).unwrap_or(u64::from(numero));

    Some(Family {
        id,
        numero,
        nome,
        foto,
        sorteado,
        data_sorteio,
    })
}

impl FamilyStore {
    /// Cached roster. Reads from disk only on the first call or when
    /// `force_reload` is set; unreadable or malformed files degrade to an
    /// empty roster with a warning, never an error.
    pub fn load_families(&mut self, force_reload: bool) -> Vec<Family> {
        if !force_reload {
            if let Some(cached) = &self.families_cache {
                return cached.clone();
            }
        }

        let file = self.locations.familias_file();
        if !file.exists() {
            self.families_cache = Some(Vec::new());
            return Vec::new();
        }

        let raw = match fs::read_to_string(&file) {
            Ok(raw) => raw,
            Err(err) => {
                warn::emit(
                    "FAMILIES_READ_FAILED",
                    "load",
                    &file.display().to_string(),
                    &err.to_string(),
                );
                return Vec::new();
            }
        };
        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn::emit(
                    "FAMILIES_PARSE_FAILED",
                    "load",
                    &file.display().to_string(),
                    &err.to_string(),
                );
                return Vec::new();
            }
        };

        let families: Vec<Family> = values
            .iter()
            .filter_map(|value| coerce_record(value, &self.locations))
            .collect();
        self.families_cache = Some(families.clone());
        families
    }

    /// Normalize every photo reference and persist the full roster
    /// atomically. The cache is replaced only after the write lands.
    pub fn save_families(&mut self, mut families: Vec<Family>) -> Result<(), StoreError> {
        for family in &mut families {
            family.foto = normalize_foto(&family.foto, &self.locations);
        }
        atomic::write_json_atomic(&self.locations.familias_file(), &families)?;
        self.families_cache = Some(families);
        Ok(())
    }

    /// Register a family. Numbering is append-only: `id` and `numero` are
    /// `max(existing) + 1`, so deleted numbers stay vacant until the next
    /// reset compacts them.
    pub fn add_family(&mut self, nome: &str, photo: &Path) -> Result<Family, StoreError> {
        let nome = nome.trim();
        if nome.is_empty() {
            return Err(StoreError::BlankName);
        }

        let foto = self.ingest_photo(photo)?;
        let mut families = self.load_families(false);
        let id = families.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        let numero = families.iter().map(|f| f.numero).max().unwrap_or(0) + 1;
        let family = Family {
            id,
            numero,
            nome: nome.to_string(),
            foto,
            sorteado: false,
            data_sorteio: None,
        };

        families.push(family.clone());
        if let Err(err) = self.save_families(families) {
            // The roster never referenced the new photo; drop the orphan.
            self.discard_stored_photo(&family.foto);
            return Err(err);
        }
        Ok(family)
    }

    /// Rename a family and/or replace its photo, looked up by `numero`. A
    /// replacement photo is ingested to a fresh stored file; the old one is
    /// removed only after the save commits and only if no other record still
    /// references it.
    pub fn edit_family(
        &mut self,
        numero: u32,
        new_nome: Option<&str>,
        new_photo: Option<&Path>,
    ) -> Result<Family, StoreError> {
        let mut families = self.load_families(false);
        let index = families
            .iter()
            .position(|f| f.numero == numero)
            .ok_or(StoreError::UnknownFamily(numero))?;

        let mut updated = families[index].clone();
        if let Some(nome) = new_nome {
            let nome = nome.trim();
            if nome.is_empty() {
                return Err(StoreError::BlankName);
            }
            updated.nome = nome.to_string();
        }

        let old_foto = updated.foto.clone();
        let mut replaced = false;
        if let Some(photo) = new_photo {
            updated.foto = self.ingest_photo(photo)?;
            replaced = true;
        }

        families[index] = updated.clone();
        match self.save_families(families) {
            Ok(()) => {
                if replaced {
                    self.cleanup_unreferenced_photo(&old_foto);
                }
                Ok(updated)
            }
            Err(err) => {
                if replaced {
                    self.discard_stored_photo(&updated.foto);
                }
                Err(err)
            }
        }
    }

    /// Remove a family; its photo and thumbnail are deleted afterwards unless
    /// another record shares the same path.
    pub fn delete_family(&mut self, numero: u32) -> Result<Family, StoreError> {
        let mut families = self.load_families(false);
        let index = families
            .iter()
            .position(|f| f.numero == numero)
            .ok_or(StoreError::UnknownFamily(numero))?;

        let removed = families.remove(index);
        self.save_families(families)?;
        self.cleanup_unreferenced_photo(&removed.foto);
        Ok(removed)
    }

    /// Flip a family's drawn status. Drawing stamps today's date and commits
    /// the last-drawn pointer; reverting clears the date and recomputes the
    /// pointer, since the reverted family may be the one it referenced.
    ///
    /// Once the roster save lands the operation has succeeded: a pointer
    /// write failure after that point is warned and absorbed rather than
    /// reported, because the pointer is derived state that `last_drawn`
    /// rebuilds from the roster on the next read.
    pub fn set_drawn(&mut self, numero: u32, drawn: bool) -> Result<Family, StoreError> {
        let mut families = self.load_families(false);
        let index = families
            .iter()
            .position(|f| f.numero == numero)
            .ok_or(StoreError::UnknownFamily(numero))?;

        families[index].sorteado = drawn;
        families[index].data_sorteio = drawn
            .then(|| Local::now().format(DRAW_DATE_FORMAT).to_string());
        let updated = families[index].clone();

        self.save_families(families)?;
        let pointer = if drawn {
            self.commit_draw(numero)
        } else {
            self.recompute_last_drawn().map(|_| ())
        };
        if let Err(err) = pointer {
            warn::emit(
                "POINTER_UPDATE_FAILED",
                "set-drawn",
                &self.locations.sorteio_file().display().to_string(),
                &err.to_string(),
            );
            self.last_drawn_cache = None;
        }
        Ok(updated)
    }
}
