//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ConfigError` and `HostError` into user-facing errors
//! with help text and exit codes.

use miette::Diagnostic;
use thiserror::Error;

use honeywell_config::ConfigError;
use honeywell_core::CoreError;

use crate::host::HostError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing required config field '{field}'")]
    #[diagnostic(
        code(honeywell::missing_config),
        help(
            "Add it under [platform] in {path}, e.g.\n\
             url = \"https://mytotalconnectcomfort.com/portal\""
        )
    )]
    MissingConfig { field: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(honeywell::config))]
    Config(Box<ConfigError>),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(honeywell::validation))]
    Validation { field: String, reason: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(honeywell::not_found),
        help("Run: honeywell-wifi accessories to see cached accessories")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Could not bind the debug server to {addr}")]
    #[diagnostic(
        code(honeywell::bind_failed),
        help("Another instance may be running. Change [host] debug_port to use another port.")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(honeywell::host))]
    Host(#[from] HostError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(honeywell::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the config file location to a config failure.
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::MissingField { field } => Self::MissingConfig {
                field,
                path: path.display().to_string(),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::from_config(err, &honeywell_config::config_path())
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingConfigField { field } => ConfigError::MissingField { field }.into(),

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::AccessoryNotFound { identifier } => CliError::NotFound {
                resource_type: "accessory".into(),
                identifier,
            },

            CoreError::ServiceNotFound { accessory, service } => CliError::NotFound {
                resource_type: "service".into(),
                identifier: format!("{accessory}/{service}"),
            },

            CoreError::CharacteristicNotFound {
                accessory,
                characteristic,
            } => CliError::NotFound {
                resource_type: "characteristic".into(),
                identifier: format!("{accessory}/{characteristic}"),
            },

            CoreError::InvalidValue {
                characteristic,
                value,
            } => CliError::Validation {
                field: characteristic,
                reason: format!("unsupported value {value}"),
            },
        }
    }
}
