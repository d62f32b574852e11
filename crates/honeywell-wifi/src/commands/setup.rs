//! `setup`: one round of the configuration handshake.

use tracing::info;

use honeywell_core::{SetupContext, SetupRequest, SetupResponse};

use crate::cli::{GlobalOpts, SetupArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: SetupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (mut cfg, path) = super::load(global)?;
    let (platform, host) = super::open_platform(&cfg, &path)?;
    host.launch(&platform).await;

    let mut context = SetupContext::new();
    let request = args.name.map(|name| SetupRequest::with_input("name", name));
    let response = platform
        .configuration_request(&mut context, request.as_ref())
        .await;

    if let SetupResponse::Save(save) = &response {
        honeywell_config::apply_save(&mut cfg, save)
            .and_then(|()| honeywell_config::save_config_to(&path, &cfg))
            .map_err(|e| CliError::from_config(e, &path))?;
        info!(path = %path.display(), "platform config saved");
    }

    let out = output::render_single(&global.output, &response, |r| {
        output::render_json(r, false)
    })?;
    output::print_output(&out)?;
    Ok(())
}
