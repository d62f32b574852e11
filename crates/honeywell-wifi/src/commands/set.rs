//! `set`: write one thermostat characteristic and persist it to the cache.

use honeywell_core::{Accessory, CharacteristicKind, CharacteristicValue, ServiceKind};

use crate::cli::{GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let id = super::parse_accessory_id(&args.uuid)?;
    let kind: CharacteristicKind = args.characteristic.parse().map_err(|_| CliError::Validation {
        field: "characteristic".into(),
        reason: format!("unknown characteristic '{}'", args.characteristic),
    })?;
    let value = CharacteristicValue::parse(kind, &args.value)?;

    let (cfg, path) = super::load(global)?;
    let (platform, host) = super::open_platform(&cfg, &path)?;
    host.launch(&platform).await;

    let stored = platform.set_characteristic(&id, kind, value).await?;

    let out = output::render_single(&global.output, &stored, |acc| Ok(detail(acc, kind)))?;
    output::print_output(&out)?;
    Ok(())
}

fn detail(acc: &Accessory, kind: CharacteristicKind) -> String {
    let value = acc
        .service(ServiceKind::Thermostat)
        .and_then(|svc| svc.value(kind))
        .map_or_else(|| "-".to_owned(), |v| v.to_string());
    format!("{}: {kind} = {value}", acc.display_name)
}
