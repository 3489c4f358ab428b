use anyhow::Result;

use crate::commands::{CommandReport, open_store};

/// The startup integrity pass of the original application, exposed as a
/// command so its first-run result stays observable.
pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("validate");
    let mut store = open_store()?;

    let outcome = store.validate_families();
    report.detail(format!(
        "families: scanned={} kept={} repaired={} dropped={} thumbnails_created={}",
        outcome.scanned,
        outcome.kept,
        outcome.repaired,
        outcome.dropped,
        outcome.thumbnails_created
    ));
    if !outcome.ok {
        report.issue("family file was corrupt; a .bak copy was kept and the roster reset");
    }

    if store.validate_draw() {
        match store.last_drawn(false) {
            Some(numero) => report.detail(format!("last drawn pointer: {numero}")),
            None => report.detail("last drawn pointer: none"),
        }
    }
    Ok(report)
}
