//! Configuration for the honeywell-wifi plugin binary.
//!
//! TOML config file + `HONEYWELL_` environment overlay, the save path used
//! by the configuration handshake, and translation to
//! `honeywell_core::PlatformConfig`.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use honeywell_core::setup::{ConfigSection, SaveInstruction};
use honeywell_core::{CoreError, DEBUG_PORT, PLATFORM_NAME, PlatformConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required config field '{field}'")]
    MissingField { field: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingConfigField { field } => Self::MissingField { field },
            other => Self::Validation {
                field: "platform".into(),
                reason: other.to_string(),
            },
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// The platform block the host hands to the plugin.
    #[serde(default)]
    pub platform: PlatformSection,

    /// Settings for the local host harness.
    #[serde(default)]
    pub host: HostSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlatformSection {
    /// Platform identifier the block is routed to.
    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Service endpoint. Required at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Keys the plugin does not interpret, kept for round trips.
    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl Default for PlatformSection {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            name: None,
            url: None,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostSection {
    /// Where the accessory cache lives. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,

    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_debug_bind")]
    pub debug_bind: IpAddr,
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            storage_path: None,
            debug_port: default_debug_port(),
            debug_bind: default_debug_bind(),
        }
    }
}

impl HostSection {
    /// Resolved storage directory.
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(default_storage_dir)
    }

    /// Address the debug trigger server binds to.
    pub fn debug_addr(&self) -> SocketAddr {
        SocketAddr::new(self.debug_bind, self.debug_port)
    }
}

fn default_platform() -> String {
    PLATFORM_NAME.into()
}
fn default_debug_port() -> u16 {
    DEBUG_PORT
}
fn default_debug_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "honeywell-wifi", "honeywell-wifi")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default storage directory for the host harness.
pub fn default_storage_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("honeywell-wifi");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load config from `path` + environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HONEYWELL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Validate the platform block into the core's runtime config.
pub fn platform_config(cfg: &Config) -> Result<PlatformConfig, ConfigError> {
    let section = &cfg.platform;
    let config = PlatformConfig::from_raw(section.url.as_deref(), section.name.clone())?;
    Ok(config)
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Fold a handshake save into `cfg`.
///
/// `replace` swaps the whole `[platform]` table; otherwise the saved keys
/// are laid over the existing ones.
pub fn apply_save(cfg: &mut Config, save: &SaveInstruction) -> Result<(), ConfigError> {
    if save.section != ConfigSection::Platform {
        return Err(ConfigError::Validation {
            field: "section".into(),
            reason: "only the platform section can be saved".into(),
        });
    }

    let incoming: PlatformSection =
        serde_json::from_value(save.config.clone()).map_err(|e| ConfigError::Validation {
            field: "platform".into(),
            reason: e.to_string(),
        })?;

    if save.replace {
        cfg.platform = incoming;
        return Ok(());
    }

    let current = &mut cfg.platform;
    current.platform = incoming.platform;
    if incoming.name.is_some() {
        current.name = incoming.name;
    }
    if incoming.url.is_some() {
        current.url = incoming.url;
    }
    current.extra.extend(incoming.extra);
    Ok(())
}
