use crate::error::StoreError;
use crate::store::config::BackupConfig;
use crate::store::paths::StorageLocations;
use crate::store::warn;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip the whole data directory into `backups/<stamp>_v<version>[_<n>].zip`.
/// The backups directory itself is excluded, so a snapshot never swallows
/// earlier snapshots (or the one being written). Older archives beyond the
/// configured retention are rotated out afterwards.
pub fn create_backup(
    locations: &StorageLocations,
    config: &BackupConfig,
    version: &str,
) -> Result<PathBuf, StoreError> {
    let backups_dir = locations.backups_dir();
    fs::create_dir_all(&backups_dir)?;

    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let base = format!("{stamp}_v{version}");
    let mut target = backups_dir.join(format!("{base}.zip"));
    let mut counter = 1;
    while target.exists() {
        target = backups_dir.join(format!("{base}_{counter}.zip"));
        counter += 1;
    }

    write_zip(&locations.data_root, &backups_dir, &target)?;
    rotate_backups(&backups_dir, config.keep);
    Ok(target)
}

fn write_zip(data_root: &Path, backups_dir: &Path, target: &Path) -> Result<(), StoreError> {
    let file = fs::File::create(target)?;
    let mut archive = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(data_root).min_depth(1) {
        let entry = entry.map_err(|err| StoreError::Io(err.into()))?;
        let path = entry.path();
        if path.starts_with(backups_dir) {
            continue;
        }
        let Ok(rel) = path.strip_prefix(data_root) else {
            continue;
        };
        let name = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            archive.add_directory(format!("{name}/"), options)?;
        } else {
            archive.start_file(name, options)?;
            let mut src = fs::File::open(path)?;
            io::copy(&mut src, &mut archive)?;
        }
    }

    archive.finish()?;
    Ok(())
}

/// Keep the newest `keep` archives, best-effort. Rotation failures are
/// warned, never surfaced: the snapshot that was just written is already
/// safe.
fn rotate_backups(dir: &Path, keep: usize) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn::emit(
                "BACKUP_ROTATE_FAILED",
                "backup",
                &dir.display().to_string(),
                &err.to_string(),
            );
            return;
        }
    };

    let mut archives: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("zip"))
        .collect();
    if archives.len() <= keep {
        return;
    }

    // Timestamped names sort chronologically; mtime would work too but is
    // coarser on some filesystems.
    archives.sort();
    let excess = archives.len() - keep;
    for old in &archives[..excess] {
        if let Err(err) = fs::remove_file(old) {
            warn::emit(
                "BACKUP_ROTATE_FAILED",
                "backup",
                &old.display().to_string(),
                &err.to_string(),
            );
        }
    }
}
