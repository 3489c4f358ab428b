use crate::error::StoreError;
use crate::store::{FamilyStore, atomic, warn};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const DRAW_DATE_FORMAT: &str = "%d/%m/%Y";

/// Wire shape of `dados/sorteio.json`.
#[derive(Debug, Serialize)]
struct DrawRecord {
    ultimo_sorteado: u32,
}

/// Strict `DD/MM/YYYY`: exactly two digits, two digits, four digits, and a
/// real calendar date.
pub fn is_valid_draw_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return false;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    digits_ok && NaiveDate::parse_from_str(raw, DRAW_DATE_FORMAT).is_ok()
}

pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DRAW_DATE_FORMAT).ok()
}

fn coerce_pointer(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Persisted pointer value, if the file exists and holds something number
/// shaped. Read failures are warned and treated as absent.
fn read_pointer(file: &Path) -> Option<u32> {
    if !file.exists() {
        return None;
    }
    let raw = match fs::read_to_string(file) {
        Ok(raw) => raw,
        Err(err) => {
            warn::emit(
                "POINTER_READ_FAILED",
                "last-drawn",
                &file.display().to_string(),
                &err.to_string(),
            );
            return None;
        }
    };
    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn::emit(
                "POINTER_PARSE_FAILED",
                "last-drawn",
                &file.display().to_string(),
                &err.to_string(),
            );
            return None;
        }
    };
    value.get("ultimo_sorteado").and_then(coerce_pointer)
}

impl FamilyStore {
    /// `numero` of the most recently drawn family, or `None` when nothing is
    /// drawn. The persisted pointer is trusted only if it references a family
    /// currently marked drawn; anything else (stale value, deleted family,
    /// missing or garbled file) falls through to recomputation.
    pub fn last_drawn(&mut self, force_reload: bool) -> Option<u32> {
        if !force_reload {
            if let Some(cached) = self.last_drawn_cache {
                return cached;
            }
        }

        let file = self.locations.sorteio_file();
        let persisted = read_pointer(&file);
        let families = self.load_families(false);
        let valid =
            persisted.filter(|n| families.iter().any(|f| f.numero == *n && f.sorteado));

        match valid {
            Some(numero) => {
                self.last_drawn_cache = Some(Some(numero));
                Some(numero)
            }
            None => self.recompute_last_drawn().unwrap_or_else(|err| {
                warn::emit(
                    "POINTER_RECOMPUTE_FAILED",
                    "last-drawn",
                    &file.display().to_string(),
                    &err.to_string(),
                );
                None
            }),
        }
    }

    /// Rebuild the pointer from the roster: among drawn families, the most
    /// recent `data_sorteio` wins; ties and missing dates fall back to the
    /// highest `numero`. With nothing drawn the pointer file is removed.
    pub fn recompute_last_drawn(&mut self) -> Result<Option<u32>, StoreError> {
        let families = self.load_families(false);
        let winner = families
            .iter()
            .filter(|f| f.sorteado)
            .max_by_key(|f| {
                (
                    f.data_sorteio.as_deref().and_then(parse_draw_date),
                    f.numero,
                )
            })
            .map(|f| f.numero);

        match winner {
            Some(numero) => {
                self.commit_draw(numero)?;
                Ok(Some(numero))
            }
            None => {
                let file = self.locations.sorteio_file();
                if file.exists() {
                    fs::remove_file(&file)?;
                }
                self.last_drawn_cache = Some(None);
                Ok(None)
            }
        }
    }

    /// Persist `numero` as the last drawn family and update the cache.
    pub fn commit_draw(&mut self, numero: u32) -> Result<(), StoreError> {
        atomic::write_json_atomic(
            &self.locations.sorteio_file(),
            &DrawRecord {
                ultimo_sorteado: numero,
            },
        )?;
        self.last_drawn_cache = Some(Some(numero));
        Ok(())
    }

    /// Start the raffle over: clear every drawn status and date, deal a fresh
    /// uniform permutation of `1..=N` as the new numbers, and drop the
    /// pointer. The pointer file is touched only after the roster save
    /// commits, so a failed save leaves no partial reset behind.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        let mut families = self.load_families(false);
        let mut numbers: Vec<u32> = (1..=families.len() as u32).collect();
        numbers.shuffle(&mut rand::thread_rng());

        for (family, numero) in families.iter_mut().zip(numbers) {
            family.numero = numero;
            family.sorteado = false;
            family.data_sorteio = None;
        }
        self.save_families(families)?;

        let file = self.locations.sorteio_file();
        if file.exists() {
            if let Err(err) = fs::remove_file(&file) {
                warn::emit(
                    "POINTER_REMOVE_FAILED",
                    "reset",
                    &file.display().to_string(),
                    &err.to_string(),
                );
            }
        }
        self.last_drawn_cache = Some(None);
        Ok(())
    }
}
