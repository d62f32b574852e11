//! `run`: restore cached accessories and serve debug triggers until Ctrl-C.

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use honeywell_core::{PLUGIN_NAME, plugin_version};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::server;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (cfg, path) = super::load(global)?;
    let (platform, host) = super::open_platform(&cfg, &path)?;
    info!("{PLUGIN_NAME} v{}", plugin_version());

    let addr = cfg.host.debug_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CliError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let restored = host.launch(&platform).await;
    info!(restored, "cached accessories restored");

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl-C, shutting down");
                on_signal.cancel();
            }
            Err(e) => warn!(error = %e, "Ctrl-C handler unavailable"),
        }
    });

    server::serve(listener, platform, shutdown).await?;
    Ok(())
}
