//! `accessories`: list what the host cache holds.

use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::host::{CachedAccessory, LocalHost};
use crate::output;

#[derive(Tabled)]
struct AccessoryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Reachable")]
    reachable: String,
    #[tabled(rename = "Services")]
    services: String,
    #[tabled(rename = "Platform")]
    platform: String,
}

fn row(entry: &CachedAccessory) -> AccessoryRow {
    let acc = &entry.accessory;
    AccessoryRow {
        name: acc.display_name.clone(),
        uuid: acc.id.to_string(),
        reachable: if acc.reachable { "yes" } else { "no" }.into(),
        services: acc
            .services
            .iter()
            .map(|s| format!("{} ({})", s.kind, s.name))
            .collect::<Vec<_>>()
            .join(", "),
        platform: entry.platform.clone(),
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (cfg, _) = super::load(global)?;
    let host = LocalHost::open(&cfg.host.storage_dir())?;
    let entries = host.entries();

    let out = output::render_list(&global.output, &entries, row, |e| {
        e.accessory.id.to_string()
    })?;
    output::print_output(&out)?;
    Ok(())
}
