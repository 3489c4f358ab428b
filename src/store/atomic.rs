use crate::error::StoreError;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize `value` as pretty JSON and replace `path` in one step: the data
/// goes to a sibling temp file first, then an atomic rename moves it over the
/// destination. A reader never observes a truncated file, and a failed write
/// leaves the previous contents untouched.
///
/// The temp file is created in the destination directory, so the rename stays
/// on one filesystem.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut payload = serde_json::to_vec_pretty(value)?;
    payload.push(b'\n');

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(&payload)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| StoreError::Io(err.error))?;
    Ok(())
}
