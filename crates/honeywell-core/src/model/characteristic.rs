// ── Characteristic domain types ──
//
// A characteristic is one readable/writable attribute of a service. Values
// are typed scalars; a write must match the kind's value type.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::CoreError;

/// Heating/cooling mode, shared by the current and target state kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HeatingCoolingState {
    Off,
    Heat,
    Cool,
    /// Only valid as a target; the unit is never "currently" auto.
    Auto,
}

impl HeatingCoolingState {
    /// Numeric value on the wire.
    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Heat => 1,
            Self::Cool => 2,
            Self::Auto => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::Heat),
            2 => Some(Self::Cool),
            3 => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Unit the thermostat displays temperatures in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TemperatureDisplayUnits {
    Celsius,
    Fahrenheit,
}

impl TemperatureDisplayUnits {
    pub fn code(self) -> u8 {
        match self {
            Self::Celsius => 0,
            Self::Fahrenheit => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Celsius),
            1 => Some(Self::Fahrenheit),
            _ => None,
        }
    }
}

/// Characteristic kinds exposed by the thermostat service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CharacteristicKind {
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    CurrentTemperature,
    TargetTemperature,
    TemperatureDisplayUnits,
}

impl CharacteristicKind {
    /// Short-form HAP type code.
    pub fn type_code(self) -> u16 {
        match self {
            Self::CurrentHeatingCoolingState => 0x000F,
            Self::CurrentTemperature => 0x0011,
            Self::TargetHeatingCoolingState => 0x0033,
            Self::TargetTemperature => 0x0035,
            Self::TemperatureDisplayUnits => 0x0036,
        }
    }

    /// Whether `value` has the right type (and range) for this kind.
    pub fn accepts(self, value: &CharacteristicValue) -> bool {
        match (self, value) {
            (Self::CurrentHeatingCoolingState, CharacteristicValue::HeatingCooling(state)) => {
                *state != HeatingCoolingState::Auto
            }
            (Self::TargetHeatingCoolingState, CharacteristicValue::HeatingCooling(_))
            | (Self::TemperatureDisplayUnits, CharacteristicValue::DisplayUnits(_)) => true,
            (
                Self::CurrentTemperature | Self::TargetTemperature,
                CharacteristicValue::Temperature(t),
            ) => t.is_finite(),
            _ => false,
        }
    }
}

/// A typed characteristic value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CharacteristicValue {
    HeatingCooling(HeatingCoolingState),
    DisplayUnits(TemperatureDisplayUnits),
    /// Degrees Celsius.
    Temperature(f64),
}

impl CharacteristicValue {
    /// Parse a textual value for `kind`.
    ///
    /// Temperatures take a number in degrees Celsius. Mode and unit kinds
    /// take either a name (`heat`, `fahrenheit`) or the numeric code.
    pub fn parse(kind: CharacteristicKind, raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let code = raw.parse::<u8>().ok();
        let value = match kind {
            CharacteristicKind::CurrentTemperature | CharacteristicKind::TargetTemperature => {
                raw.parse::<f64>().ok().map(Self::Temperature)
            }
            CharacteristicKind::CurrentHeatingCoolingState
            | CharacteristicKind::TargetHeatingCoolingState => code
                .map_or_else(|| raw.parse().ok(), HeatingCoolingState::from_code)
                .map(Self::HeatingCooling),
            CharacteristicKind::TemperatureDisplayUnits => code
                .map_or_else(|| raw.parse().ok(), TemperatureDisplayUnits::from_code)
                .map(Self::DisplayUnits),
        };

        value
            .filter(|v| kind.accepts(v))
            .ok_or_else(|| CoreError::InvalidValue {
                characteristic: kind.to_string(),
                value: raw.to_owned(),
            })
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeatingCooling(s) => write!(f, "{s}"),
            Self::DisplayUnits(u) => write!(f, "{u}"),
            Self::Temperature(t) => write!(f, "{t}"),
        }
    }
}

/// Called after a value has been stored. Returning `Ok` completes the write.
pub type SetHandler =
    Arc<dyn Fn(&str, CharacteristicKind, &CharacteristicValue) -> Result<(), CoreError> + Send + Sync>;

/// A characteristic attached to a service.
#[derive(Clone, Serialize, Deserialize)]
pub struct Characteristic {
    pub kind: CharacteristicKind,
    pub value: CharacteristicValue,

    #[serde(skip)]
    pub(crate) on_set: Option<SetHandler>,
}

impl Characteristic {
    pub fn new(kind: CharacteristicKind, value: CharacteristicValue) -> Result<Self, CoreError> {
        if !kind.accepts(&value) {
            return Err(CoreError::InvalidValue {
                characteristic: kind.to_string(),
                value: value.to_string(),
            });
        }
        Ok(Self {
            kind,
            value,
            on_set: None,
        })
    }

    pub fn has_set_handler(&self) -> bool {
        self.on_set.is_some()
    }
}

impl fmt::Debug for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Characteristic")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("on_set", &self.on_set.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn current_state_rejects_auto() {
        let auto = CharacteristicValue::HeatingCooling(HeatingCoolingState::Auto);
        assert!(!CharacteristicKind::CurrentHeatingCoolingState.accepts(&auto));
        assert!(CharacteristicKind::TargetHeatingCoolingState.accepts(&auto));
    }

    #[test]
    fn temperature_kinds_reject_other_types() {
        let units = CharacteristicValue::DisplayUnits(TemperatureDisplayUnits::Celsius);
        assert!(!CharacteristicKind::TargetTemperature.accepts(&units));
        assert!(CharacteristicKind::TemperatureDisplayUnits.accepts(&units));
    }

    #[test]
    fn temperature_must_be_finite() {
        let nan = CharacteristicValue::Temperature(f64::NAN);
        assert!(!CharacteristicKind::CurrentTemperature.accepts(&nan));
    }

    #[test]
    fn new_validates_value() {
        let err = Characteristic::new(
            CharacteristicKind::CurrentTemperature,
            CharacteristicValue::HeatingCooling(HeatingCoolingState::Cool),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { .. }));
    }

    #[test]
    fn parse_accepts_names_and_codes() {
        let heat = CharacteristicValue::HeatingCooling(HeatingCoolingState::Heat);
        let kind = CharacteristicKind::TargetHeatingCoolingState;
        assert_eq!(CharacteristicValue::parse(kind, "heat").unwrap(), heat);
        assert_eq!(CharacteristicValue::parse(kind, "HEAT").unwrap(), heat);
        assert_eq!(CharacteristicValue::parse(kind, "1").unwrap(), heat);
        assert_eq!(
            CharacteristicValue::parse(CharacteristicKind::TargetTemperature, " 21.5 ").unwrap(),
            CharacteristicValue::Temperature(21.5)
        );
        assert_eq!(
            CharacteristicValue::parse(CharacteristicKind::TemperatureDisplayUnits, "fahrenheit")
                .unwrap(),
            CharacteristicValue::DisplayUnits(TemperatureDisplayUnits::Fahrenheit)
        );
    }

    #[test]
    fn parse_rejects_values_the_kind_does_not_accept() {
        for (kind, raw) in [
            (CharacteristicKind::CurrentHeatingCoolingState, "auto"),
            (CharacteristicKind::TargetHeatingCoolingState, "7"),
            (CharacteristicKind::TargetTemperature, "warm"),
            (CharacteristicKind::CurrentTemperature, "NaN"),
            (CharacteristicKind::TemperatureDisplayUnits, "kelvin"),
        ] {
            let err = CharacteristicValue::parse(kind, raw).unwrap_err();
            assert!(matches!(err, CoreError::InvalidValue { .. }), "{kind} {raw}");
        }
    }

    #[test]
    fn kind_names_parse_case_insensitively() {
        assert_eq!(
            "targettemperature".parse::<CharacteristicKind>().unwrap(),
            CharacteristicKind::TargetTemperature
        );
    }

    #[test]
    fn type_codes_are_unique() {
        let mut codes: Vec<u16> = CharacteristicKind::iter().map(|k| k.type_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), CharacteristicKind::iter().count());
    }

    #[test]
    fn wire_codes() {
        assert_eq!(HeatingCoolingState::Cool.code(), 2);
        assert_eq!(TemperatureDisplayUnits::Fahrenheit.code(), 1);
    }

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("COOL".parse::<HeatingCoolingState>().unwrap(), HeatingCoolingState::Cool);
    }

    #[test]
    fn value_serializes_tagged() {
        let json = serde_json::to_value(CharacteristicValue::Temperature(22.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "temperature", "value": 22.0 }));
    }
}
