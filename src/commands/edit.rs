use anyhow::Result;
use std::path::PathBuf;

use crate::commands::{CommandReport, open_store};

#[derive(Debug, Clone)]
pub struct EditOptions {
    pub numero: u32,
    pub nome: Option<String>,
    pub foto: Option<PathBuf>,
}

pub fn run(opts: &EditOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("edit");
    if opts.nome.is_none() && opts.foto.is_none() {
        report.issue("nothing to change: pass --nome and/or --foto");
        return Ok(report);
    }

    let mut store = open_store()?;
    match store.edit_family(opts.numero, opts.nome.as_deref(), opts.foto.as_deref()) {
        Ok(family) => {
            report.detail(format!(
                "updated family {} ('{}')",
                family.numero, family.nome
            ));
            if opts.foto.is_some() {
                report.detail(format!("foto={}", family.foto));
            }
        }
        Err(err) => report.issue(format!("edit failed: {err}")),
    }
    Ok(report)
}
