use anyhow::Result;
use chrono::Local;

use crate::commands::{CommandReport, open_store};
use crate::store::draw::DRAW_DATE_FORMAT;

/// Operator shortcut: mark the whole roster drawn with today's date, then
/// recompute the pointer. Useful when closing out a season by hand.
pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("mark-all-drawn");
    let mut store = open_store()?;

    let mut families = store.load_families(true);
    if families.is_empty() {
        report.detail("no families registered");
        return Ok(report);
    }

    let today = Local::now().format(DRAW_DATE_FORMAT).to_string();
    for family in &mut families {
        family.sorteado = true;
        family.data_sorteio = Some(today.clone());
    }
    let total = families.len();

    if let Err(err) = store.save_families(families) {
        report.issue(format!("mark-all-drawn failed: {err}"));
        return Ok(report);
    }
    if let Err(err) = store.recompute_last_drawn() {
        report.issue(format!("pointer recompute failed: {err}"));
        return Ok(report);
    }
    report.detail(format!("marked {total} families drawn on {today}"));
    Ok(report)
}
