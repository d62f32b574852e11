// ── Core error types ──
//
// Errors surfaced by the platform controller. Host calls are assumed to
// succeed, so nothing here describes a host failure -- only bad
// configuration and bad requests routed in from the host side.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Accessory not found: {identifier}")]
    AccessoryNotFound { identifier: String },

    #[error("Service {service} not found on accessory {accessory}")]
    ServiceNotFound { accessory: String, service: String },

    #[error("Characteristic {characteristic} not found on accessory {accessory}")]
    CharacteristicNotFound {
        accessory: String,
        characteristic: String,
    },

    // ── Write errors ─────────────────────────────────────────────────
    #[error("Invalid value for {characteristic}: {value}")]
    InvalidValue {
        characteristic: String,
        value: String,
    },
}
