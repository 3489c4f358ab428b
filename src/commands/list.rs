use anyhow::Result;

use crate::commands::{CommandReport, open_store};

pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("list");
    let mut store = open_store()?;

    let families = store.load_families(true);
    if families.is_empty() {
        report.detail("no families registered");
        return Ok(report);
    }

    for family in &families {
        let status = match family.data_sorteio.as_deref() {
            Some(date) if family.sorteado => format!("drawn {date}"),
            _ if family.sorteado => "drawn".to_string(),
            _ => "not drawn".to_string(),
        };
        let foto = if family.foto.is_empty() {
            "-"
        } else {
            family.foto.as_str()
        };
        report.detail(format!(
            "#{:<4} {} [{}] foto={}",
            family.numero, family.nome, status, foto
        ));
    }

    let drawn = families.iter().filter(|f| f.sorteado).count();
    report.detail(format!("total={} drawn={}", families.len(), drawn));
    Ok(report)
}
