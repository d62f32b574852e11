//! Command handlers: bridge CLI args -> platform / host -> output formatting.

pub mod accessories;
pub mod config_cmd;
pub mod identify;
pub mod run;
pub mod set;
pub mod setup;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use honeywell_config::Config;
use honeywell_core::{AccessoryId, HostApi, Platform};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::host::LocalHost;

/// Config file in effect: `--config` / `HONEYWELL_CONFIG`, else the default.
pub fn effective_config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(honeywell_config::config_path)
}

/// Load the config file + environment.
pub fn load(global: &GlobalOpts) -> Result<(Config, PathBuf), CliError> {
    let path = effective_config_path(global);
    let cfg = honeywell_config::load_config_from(&path)
        .map_err(|e| CliError::from_config(e, &path))?;
    Ok((cfg, path))
}

/// Parse an accessory UUID given on the command line.
pub fn parse_accessory_id(raw: &str) -> Result<AccessoryId, CliError> {
    raw.parse().map_err(|e| CliError::Validation {
        field: "uuid".into(),
        reason: format!("'{raw}' is not a UUID: {e}"),
    })
}

/// Validate the platform block and wire a platform to the local host.
///
/// Fails before anything touches the network when `url` is missing.
pub fn open_platform(
    cfg: &Config,
    path: &Path,
) -> Result<(Platform, Arc<LocalHost>), CliError> {
    let platform_config =
        honeywell_config::platform_config(cfg).map_err(|e| CliError::from_config(e, path))?;

    let storage = cfg.host.storage_dir();
    tracing::info!(path = %storage.display(), "storage path");

    let host = Arc::new(LocalHost::open(&storage)?);
    tracing::debug!(cache = %host.cache_path().display(), "accessory cache");
    let platform = Platform::new(platform_config, Some(Arc::clone(&host) as Arc<dyn HostApi>));
    Ok((platform, host))
}
