// ── Accessory domain model ──
//
// Canonical representation of what the plugin exposes to the host:
// accessories, their services, and the characteristics on those services.

pub mod accessory;
pub mod accessory_id;
pub mod characteristic;
pub mod service;

// ── Re-exports ──────────────────────────────────────────────────────

pub use accessory::{Accessory, IdentifyHandler};
pub use accessory_id::AccessoryId;
pub use characteristic::{
    Characteristic, CharacteristicKind, CharacteristicValue, HeatingCoolingState, SetHandler,
    TemperatureDisplayUnits,
};
pub use service::{Service, ServiceKind};
