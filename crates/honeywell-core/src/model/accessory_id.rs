// ── Accessory identity ──
//
// Identifiers are derived from the accessory name so the host can match a
// freshly added accessory against its cache across restarts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace all accessory identifiers are derived in.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1d_4a3e_9b27_5c80_a1e4_3d52_b6c9_0f17);

/// Stable accessory identifier (name-based UUID, SHA-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Derive the identifier for an accessory name. Same name, same id.
    pub fn derive(name: &str) -> Self {
        Self(Uuid::new_v5(&ACCESSORY_NAMESPACE, name.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccessoryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for AccessoryId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        for name in ["Living Room", "", "2026-10-18T09:15:02.123Z", "Fancy Light"] {
            assert_eq!(AccessoryId::derive(name), AccessoryId::derive(name));
        }
    }

    #[test]
    fn different_names_give_different_ids() {
        assert_ne!(AccessoryId::derive("Upstairs"), AccessoryId::derive("Downstairs"));
    }

    #[test]
    fn derived_id_is_name_based_sha1() {
        let id = AccessoryId::derive("Test");
        assert_eq!(id.as_uuid().get_version_num(), 5);
    }

    #[test]
    fn display_and_parse_round_trip() {
        let id = AccessoryId::derive("Hallway");
        let parsed: AccessoryId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<AccessoryId>().is_err());
    }
}
