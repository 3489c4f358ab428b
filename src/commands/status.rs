use anyhow::Result;

use crate::commands::{APP_VERSION, CommandReport, open_store};

pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("status");
    let mut store = open_store()?;
    let locations = store.locations().clone();

    report.detail(format!("version={APP_VERSION}"));
    report.detail(format!("data_root={}", locations.data_root.display()));
    report.detail(format!("familias_file={}", locations.familias_file().display()));
    report.detail(format!("sorteio_file={}", locations.sorteio_file().display()));
    report.detail(format!("images_dir={}", locations.images_dir().display()));
    report.detail(format!("thumbs_dir={}", locations.thumbs_dir().display()));
    report.detail(format!("backups_dir={}", locations.backups_dir().display()));

    let families = store.load_families(true);
    let drawn = families.iter().filter(|f| f.sorteado).count();
    report.detail(format!(
        "families={} drawn={} undrawn={}",
        families.len(),
        drawn,
        families.len() - drawn
    ));
    match store.last_drawn(true) {
        Some(numero) => report.detail(format!("last_drawn={numero}")),
        None => report.detail("last_drawn=none"),
    }
    Ok(report)
}
