//! `identify`: route an identify request to a cached accessory.

use crate::cli::{GlobalOpts, IdentifyArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &IdentifyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let id = super::parse_accessory_id(&args.uuid)?;
    let (cfg, path) = super::load(global)?;
    let (platform, host) = super::open_platform(&cfg, &path)?;
    host.launch(&platform).await;

    platform.identify(&id, !args.unpaired).await?;

    output::print_output(&id.to_string())?;
    Ok(())
}
