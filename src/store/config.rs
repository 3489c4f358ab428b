use crate::error::StoreError;
use crate::store::paths::StorageLocations;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Photos larger than this on either axis are downscaled to fit.
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub thumb_size: u32,
    pub thumb_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1600,
            jpeg_quality: 85,
            thumb_size: 240,
            thumb_quality: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Newest snapshots kept in `backups/`; older ones are rotated out.
    pub keep: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self { keep: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    pub image: ImageConfig,
    pub backup: BackupConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialStoreConfig {
    image: Option<ImageConfig>,
    backup: Option<BackupConfig>,
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u8(var: &str, fallback: u8) -> u8 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u8>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn validate(cfg: &StoreConfig) -> Result<(), StoreError> {
    if cfg.image.max_dimension == 0 {
        return Err(StoreError::InvalidConfig(
            "image max dimension must be >= 1 pixel".to_string(),
        ));
    }
    if cfg.image.thumb_size == 0 {
        return Err(StoreError::InvalidConfig(
            "thumbnail size must be >= 1 pixel".to_string(),
        ));
    }
    if !(1..=100).contains(&cfg.image.jpeg_quality) {
        return Err(StoreError::InvalidConfig(
            "jpeg quality must be between 1 and 100".to_string(),
        ));
    }
    if !(1..=100).contains(&cfg.image.thumb_quality) {
        return Err(StoreError::InvalidConfig(
            "thumbnail quality must be between 1 and 100".to_string(),
        ));
    }
    if cfg.backup.keep == 0 {
        return Err(StoreError::InvalidConfig(
            "backup retention must keep at least 1 snapshot".to_string(),
        ));
    }
    Ok(())
}

fn resolve_config_path(locations: &StorageLocations) -> PathBuf {
    if let Ok(custom) = env::var("ALTAR_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    locations.data_root.join("config.toml")
}

fn merge_file_config(base: &mut StoreConfig, locations: &StorageLocations) -> Result<(), StoreError> {
    let path = resolve_config_path(locations);
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialStoreConfig = toml::from_str(&raw).map_err(|err| {
        StoreError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(image) = parsed.image {
        base.image = image;
    }
    if let Some(backup) = parsed.backup {
        base.backup = backup;
    }
    Ok(())
}

pub fn load_config(locations: &StorageLocations) -> Result<StoreConfig, StoreError> {
    let mut cfg = StoreConfig::default();
    merge_file_config(&mut cfg, locations)?;

    cfg.image.max_dimension = env_or_u32("ALTAR_IMAGE_MAX_DIMENSION", cfg.image.max_dimension);
    cfg.image.jpeg_quality = env_or_u8("ALTAR_IMAGE_JPEG_QUALITY", cfg.image.jpeg_quality);
    cfg.image.thumb_size = env_or_u32("ALTAR_THUMB_SIZE", cfg.image.thumb_size);
    cfg.image.thumb_quality = env_or_u8("ALTAR_THUMB_QUALITY", cfg.image.thumb_quality);
    cfg.backup.keep = env_or_usize("ALTAR_BACKUP_KEEP", cfg.backup.keep);

    validate(&cfg)?;
    Ok(cfg)
}
