//! Platform controller and accessory model for the `honeywell-wifi` plugin.
//!
//! This crate owns everything that sits between the host runtime and the
//! simulated thermostat:
//!
//! - **[`Platform`]**: The controller the host drives. Restores cached
//!   accessories, adds new ones, flips reachability, and unregisters
//!   everything on remove. Cheaply cloneable; every clone shares one ordered
//!   accessory collection.
//!
//! - **[`HostApi`]**: The narrow registration interface the platform calls
//!   into. Injected at construction so tests can substitute a recorder.
//!
//! - **Domain model** ([`model`]): [`Accessory`], [`Service`], and typed
//!   characteristic values, with [`AccessoryId`] derived deterministically
//!   from the accessory name.
//!
//! - **Configuration handshake** ([`setup`]): The form/save conversation
//!   the host can run with the plugin.

pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod platform;
pub mod setup;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEBUG_PORT, PLATFORM_NAME, PLUGIN_NAME, PlatformConfig, plugin_version};
pub use error::CoreError;
pub use host::HostApi;
pub use platform::Platform;
pub use setup::{SetupContext, SetupRequest, SetupResponse};
pub use store::AccessorySnapshot;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Accessory, AccessoryId, Characteristic, CharacteristicKind, CharacteristicValue,
    HeatingCoolingState, Service, ServiceKind, TemperatureDisplayUnits,
};
