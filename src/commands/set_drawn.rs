use anyhow::Result;

use crate::commands::{CommandReport, open_store};

#[derive(Debug, Clone)]
pub struct SetDrawnOptions {
    pub numero: u32,
    pub undo: bool,
}

pub fn run(opts: &SetDrawnOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("set-drawn");
    let mut store = open_store()?;

    match store.set_drawn(opts.numero, !opts.undo) {
        Ok(family) if family.sorteado => {
            let date = family.data_sorteio.as_deref().unwrap_or("-");
            report.detail(format!(
                "family {} ('{}') marked drawn on {date}",
                family.numero, family.nome
            ));
        }
        Ok(family) => report.detail(format!(
            "family {} ('{}') reverted to not drawn",
            family.numero, family.nome
        )),
        Err(err) => report.issue(format!("set-drawn failed: {err}")),
    }
    Ok(report)
}
