use anyhow::Result;
use std::path::PathBuf;

use crate::commands::{CommandReport, open_store};

#[derive(Debug, Clone)]
pub struct AddOptions {
    pub nome: String,
    pub foto: PathBuf,
}

pub fn run(opts: &AddOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("add");
    let mut store = open_store()?;

    match store.add_family(&opts.nome, &opts.foto) {
        Ok(family) => {
            report.detail(format!(
                "added family '{}' with number {}",
                family.nome, family.numero
            ));
            report.detail(format!("foto={}", family.foto));
        }
        Err(err) => report.issue(format!("add failed: {err}")),
    }
    Ok(report)
}
