// ── Service domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::characteristic::{
    Characteristic, CharacteristicKind, CharacteristicValue, HeatingCoolingState,
    TemperatureDisplayUnits,
};
use crate::error::CoreError;

/// Capability groupings an accessory can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[non_exhaustive]
pub enum ServiceKind {
    Thermostat,
}

impl ServiceKind {
    /// Short-form HAP type code.
    pub fn type_code(self) -> u16 {
        match self {
            Self::Thermostat => 0x004A,
        }
    }
}

/// A service and its characteristics, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub kind: ServiceKind,
    /// Display subtype name, e.g. "Test Thermo".
    pub name: String,
    pub characteristics: Vec<Characteristic>,
}

impl Service {
    pub fn new(kind: ServiceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            characteristics: Vec::new(),
        }
    }

    /// The simulated thermostat: cooling, 23° now, 22° target, Fahrenheit display.
    pub fn thermostat(name: impl Into<String>) -> Result<Self, CoreError> {
        let mut service = Self::new(ServiceKind::Thermostat, name);
        service.set_characteristic(
            CharacteristicKind::CurrentHeatingCoolingState,
            CharacteristicValue::HeatingCooling(HeatingCoolingState::Cool),
        )?;
        service.set_characteristic(
            CharacteristicKind::TargetHeatingCoolingState,
            CharacteristicValue::HeatingCooling(HeatingCoolingState::Cool),
        )?;
        service.set_characteristic(
            CharacteristicKind::CurrentTemperature,
            CharacteristicValue::Temperature(23.0),
        )?;
        service.set_characteristic(
            CharacteristicKind::TargetTemperature,
            CharacteristicValue::Temperature(22.0),
        )?;
        service.set_characteristic(
            CharacteristicKind::TemperatureDisplayUnits,
            CharacteristicValue::DisplayUnits(TemperatureDisplayUnits::Fahrenheit),
        )?;
        Ok(service)
    }

    pub fn characteristic(&self, kind: CharacteristicKind) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.kind == kind)
    }

    pub fn characteristic_mut(&mut self, kind: CharacteristicKind) -> Option<&mut Characteristic> {
        self.characteristics.iter_mut().find(|c| c.kind == kind)
    }

    /// Set an initial value, adding the characteristic if it is not there yet.
    /// Does not run any set handler.
    pub fn set_characteristic(
        &mut self,
        kind: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<(), CoreError> {
        if let Some(existing) = self.characteristic_mut(kind) {
            if !kind.accepts(&value) {
                return Err(CoreError::InvalidValue {
                    characteristic: kind.to_string(),
                    value: value.to_string(),
                });
            }
            existing.value = value;
            return Ok(());
        }
        self.characteristics.push(Characteristic::new(kind, value)?);
        Ok(())
    }

    pub fn value(&self, kind: CharacteristicKind) -> Option<CharacteristicValue> {
        self.characteristic(kind).map(|c| c.value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn thermostat_has_fixed_initial_values() {
        let svc = Service::thermostat("Test Thermo").unwrap();
        assert_eq!(svc.kind, ServiceKind::Thermostat);
        assert_eq!(svc.characteristics.len(), 5);
        assert_eq!(
            svc.value(CharacteristicKind::CurrentHeatingCoolingState),
            Some(CharacteristicValue::HeatingCooling(HeatingCoolingState::Cool))
        );
        assert_eq!(
            svc.value(CharacteristicKind::TargetHeatingCoolingState),
            Some(CharacteristicValue::HeatingCooling(HeatingCoolingState::Cool))
        );
        assert_eq!(
            svc.value(CharacteristicKind::CurrentTemperature),
            Some(CharacteristicValue::Temperature(23.0))
        );
        assert_eq!(
            svc.value(CharacteristicKind::TargetTemperature),
            Some(CharacteristicValue::Temperature(22.0))
        );
        assert_eq!(
            svc.value(CharacteristicKind::TemperatureDisplayUnits),
            Some(CharacteristicValue::DisplayUnits(TemperatureDisplayUnits::Fahrenheit))
        );
    }

    #[test]
    fn set_characteristic_updates_in_place() {
        let mut svc = Service::thermostat("T").unwrap();
        svc.set_characteristic(
            CharacteristicKind::TargetTemperature,
            CharacteristicValue::Temperature(19.5),
        )
        .unwrap();
        assert_eq!(svc.characteristics.len(), 5);
        assert_eq!(
            svc.value(CharacteristicKind::TargetTemperature),
            Some(CharacteristicValue::Temperature(19.5))
        );
    }

    #[test]
    fn set_characteristic_rejects_wrong_type_and_keeps_value() {
        let mut svc = Service::thermostat("T").unwrap();
        let err = svc
            .set_characteristic(
                CharacteristicKind::TargetTemperature,
                CharacteristicValue::DisplayUnits(TemperatureDisplayUnits::Celsius),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { .. }));
        assert_eq!(
            svc.value(CharacteristicKind::TargetTemperature),
            Some(CharacteristicValue::Temperature(22.0))
        );
    }

    #[test]
    fn thermostat_type_code() {
        assert_eq!(ServiceKind::Thermostat.type_code(), 0x4A);
    }
}
