use crate::error::StoreError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Relative prefix every stored photo path must carry, forward slashes on
/// every platform. The persisted JSON never contains absolute paths.
pub const PHOTO_PREFIX: &str = "imagens/familias/";

/// Writable data directory plus the read-only directory the application was
/// installed into. Resolved once at startup and passed by reference to every
/// collaborator; never queried ad hoc.
#[derive(Debug, Clone)]
pub struct StorageLocations {
    pub data_root: PathBuf,
    pub bundle_root: PathBuf,
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

fn default_bundle_root() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl StorageLocations {
    /// Platform-appropriate locations for the current install.
    /// `ALTAR_DATA_DIR` / `ALTAR_BUNDLE_DIR` override for tests and portable
    /// installs.
    pub fn resolve() -> Result<Self, StoreError> {
        let default_root = dirs::data_dir()
            .map(|dir| dir.join("familia-no-altar"))
            .ok_or_else(|| {
                StoreError::Environment(
                    "no platform data directory; set ALTAR_DATA_DIR".to_string(),
                )
            })?;
        let data_root = env_or_default_path("ALTAR_DATA_DIR", default_root);
        let bundle_root = env_or_default_path("ALTAR_BUNDLE_DIR", default_bundle_root());
        Ok(Self {
            data_root,
            bundle_root,
        })
    }

    /// Explicit construction for embedding and tests.
    pub fn at(data_root: PathBuf, bundle_root: PathBuf) -> Self {
        Self {
            data_root,
            bundle_root,
        }
    }

    pub fn dados_dir(&self) -> PathBuf {
        self.data_root.join("dados")
    }

    pub fn familias_file(&self) -> PathBuf {
        self.dados_dir().join("familias.json")
    }

    pub fn sorteio_file(&self) -> PathBuf {
        self.dados_dir().join("sorteio.json")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_root.join("imagens").join("familias")
    }

    pub fn thumbs_dir(&self) -> PathBuf {
        self.data_root.join("imagens").join("thumbs")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_root.join("backups")
    }

    pub fn version_file(&self) -> PathBuf {
        self.data_root.join("version.txt")
    }

    /// Derived thumbnail location for a stored photo file name:
    /// `imagens/thumbs/<stem>_thumb.jpg`.
    pub fn thumbnail_path(&self, photo_file_name: &str) -> PathBuf {
        let stem = Path::new(photo_file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(photo_file_name);
        self.thumbs_dir().join(format!("{stem}_thumb.jpg"))
    }

    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        for dir in [
            self.dados_dir(),
            self.images_dir(),
            self.thumbs_dir(),
            self.backups_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
