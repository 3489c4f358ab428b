use anyhow::Result;

use crate::commands::{CommandReport, open_store};

#[derive(Debug, Clone)]
pub struct RemoveOptions {
    pub numero: u32,
}

pub fn run(opts: &RemoveOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("remove");
    let mut store = open_store()?;

    match store.delete_family(opts.numero) {
        Ok(removed) => report.detail(format!(
            "removed family {} ('{}')",
            removed.numero, removed.nome
        )),
        Err(err) => report.issue(format!("remove failed: {err}")),
    }
    Ok(report)
}
