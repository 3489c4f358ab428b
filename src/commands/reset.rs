use anyhow::Result;

use crate::commands::{CommandReport, open_store};

pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("reset");
    let mut store = open_store()?;

    let total = store.load_families(true).len();
    match store.reset_all() {
        Ok(()) => report.detail(format!(
            "raffle reset: {total} families undrawn, numbers reshuffled 1..={total}"
        )),
        Err(err) => report.issue(format!("reset failed: {err}")),
    }
    Ok(report)
}
