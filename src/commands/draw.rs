use anyhow::Result;
use rand::seq::SliceRandom;

use crate::commands::{CommandReport, open_store};

/// The draw itself is a thin random choice over the not-yet-drawn records;
/// all the state lives in the store.
pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("draw");
    let mut store = open_store()?;

    let families = store.load_families(true);
    let undrawn: Vec<u32> = families
        .iter()
        .filter(|f| !f.sorteado)
        .map(|f| f.numero)
        .collect();
    let Some(&numero) = undrawn.choose(&mut rand::thread_rng()) else {
        report.issue("no undrawn families remain; run `altar reset` to start over");
        return Ok(report);
    };

    match store.set_drawn(numero, true) {
        Ok(family) => report.detail(format!(
            "drew family {} ('{}')",
            family.numero, family.nome
        )),
        Err(err) => report.issue(format!("draw failed: {err}")),
    }
    Ok(report)
}
