use anyhow::Result;

use crate::commands::{CommandReport, open_store};
use crate::store::backup::create_backup;

/// On-demand snapshot; the version marker is left alone so the next upgrade
/// still takes its own backup.
pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("backup");
    let store = open_store()?;

    match create_backup(
        store.locations(),
        &store.config().backup,
        crate::commands::APP_VERSION,
    ) {
        Ok(archive) => report.detail(format!("snapshot written to {}", archive.display())),
        Err(err) => report.issue(format!("backup failed: {err}")),
    }
    Ok(report)
}
