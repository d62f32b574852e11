// ── Accessory domain type ──
//
// An accessory is what the host exposes to the home automation framework.
// Handlers are runtime behavior only: they are skipped when the host
// serializes an accessory into its cache and re-attached on restore.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::accessory_id::AccessoryId;
use super::characteristic::{CharacteristicKind, CharacteristicValue, SetHandler};
use super::service::{Service, ServiceKind};
use crate::error::CoreError;

/// Called when the user asks the accessory to identify itself.
pub type IdentifyHandler = Arc<dyn Fn(&str, bool) -> Result<(), CoreError> + Send + Sync>;

#[derive(Clone, Serialize, Deserialize)]
pub struct Accessory {
    pub id: AccessoryId,
    pub display_name: String,
    #[serde(default = "default_reachable")]
    pub reachable: bool,
    #[serde(default)]
    pub services: Vec<Service>,
    /// Free-form plugin state the host caches along with the accessory.
    #[serde(default)]
    pub context: Map<String, Value>,

    #[serde(skip)]
    on_identify: Option<IdentifyHandler>,
}

fn default_reachable() -> bool {
    true
}

impl Accessory {
    /// Create an accessory whose id is derived from its name.
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self::with_id(AccessoryId::derive(&display_name), display_name)
    }

    pub fn with_id(id: AccessoryId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            reachable: true,
            services: Vec::new(),
            context: Map::new(),
            on_identify: None,
        }
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    pub fn service(&self, kind: ServiceKind) -> Option<&Service> {
        self.services.iter().find(|s| s.kind == kind)
    }

    pub fn service_mut(&mut self, kind: ServiceKind) -> Option<&mut Service> {
        self.services.iter_mut().find(|s| s.kind == kind)
    }

    pub fn update_reachability(&mut self, reachable: bool) {
        self.reachable = reachable;
    }

    // ── Handlers ─────────────────────────────────────────────────────

    pub fn on_identify<F>(&mut self, handler: F)
    where
        F: Fn(&str, bool) -> Result<(), CoreError> + Send + Sync + 'static,
    {
        self.on_identify = Some(Arc::new(handler));
    }

    pub fn has_identify_handler(&self) -> bool {
        self.on_identify.is_some()
    }

    /// Attach a set handler to one characteristic of one service.
    pub fn on_set<F>(
        &mut self,
        service: ServiceKind,
        kind: CharacteristicKind,
        handler: F,
    ) -> Result<(), CoreError>
    where
        F: Fn(&str, CharacteristicKind, &CharacteristicValue) -> Result<(), CoreError>
            + Send
            + Sync
            + 'static,
    {
        let characteristic = self
            .services
            .iter_mut()
            .find(|s| s.kind == service)
            .ok_or_else(|| CoreError::ServiceNotFound {
                accessory: self.display_name.clone(),
                service: service.to_string(),
            })?
            .characteristic_mut(kind)
            .ok_or_else(|| CoreError::CharacteristicNotFound {
                accessory: self.display_name.clone(),
                characteristic: kind.to_string(),
            })?;
        let handler: SetHandler = Arc::new(handler);
        characteristic.on_set = Some(handler);
        Ok(())
    }

    // ── Host-initiated requests ──────────────────────────────────────

    /// Run the identify handler. Without one, identify is a no-op.
    pub fn identify(&self, paired: bool) -> Result<(), CoreError> {
        match &self.on_identify {
            Some(handler) => handler(&self.display_name, paired),
            None => Ok(()),
        }
    }

    /// Store a new value, then run the characteristic's set handler.
    ///
    /// Values of the wrong type are rejected before anything is stored.
    pub fn write(
        &mut self,
        service: ServiceKind,
        kind: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<(), CoreError> {
        let characteristic = self
            .services
            .iter_mut()
            .find(|s| s.kind == service)
            .ok_or_else(|| CoreError::ServiceNotFound {
                accessory: self.display_name.clone(),
                service: service.to_string(),
            })?
            .characteristic_mut(kind)
            .ok_or_else(|| CoreError::CharacteristicNotFound {
                accessory: self.display_name.clone(),
                characteristic: kind.to_string(),
            })?;

        if !kind.accepts(&value) {
            return Err(CoreError::InvalidValue {
                characteristic: kind.to_string(),
                value: value.to_string(),
            });
        }

        characteristic.value = value;
        let handler = characteristic.on_set.clone();

        match handler {
            Some(handler) => handler(&self.display_name, kind, &value),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessory")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("reachable", &self.reachable)
            .field("services", &self.services)
            .field("context", &self.context)
            .field("on_identify", &self.on_identify.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::characteristic::{HeatingCoolingState, TemperatureDisplayUnits};
    use std::sync::Mutex;

    fn thermostat(name: &str) -> Accessory {
        let mut acc = Accessory::new(name);
        acc.add_service(Service::thermostat("Test Thermo").unwrap());
        acc
    }

    #[test]
    fn new_derives_id_from_name() {
        assert_eq!(Accessory::new("Den").id, AccessoryId::derive("Den"));
        assert!(Accessory::new("Den").reachable);
    }

    #[test]
    fn identify_without_handler_is_ok() {
        assert!(thermostat("A").identify(true).is_ok());
    }

    #[test]
    fn identify_runs_handler_with_name_and_paired_flag() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut acc = thermostat("Office");
        acc.on_identify(move |name, paired| {
            sink.lock().unwrap().push((name.to_owned(), paired));
            Ok(())
        });

        acc.identify(false).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![("Office".to_owned(), false)]);
    }

    #[test]
    fn write_stores_value_then_runs_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut acc = thermostat("Office");
        acc.on_set(
            ServiceKind::Thermostat,
            CharacteristicKind::TargetHeatingCoolingState,
            move |_, kind, value| {
                sink.lock().unwrap().push((kind, *value));
                Ok(())
            },
        )
        .unwrap();

        let heat = CharacteristicValue::HeatingCooling(HeatingCoolingState::Heat);
        acc.write(
            ServiceKind::Thermostat,
            CharacteristicKind::TargetHeatingCoolingState,
            heat,
        )
        .unwrap();

        let svc = acc.service(ServiceKind::Thermostat).unwrap();
        assert_eq!(svc.value(CharacteristicKind::TargetHeatingCoolingState), Some(heat));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(CharacteristicKind::TargetHeatingCoolingState, heat)]
        );
    }

    #[test]
    fn write_rejects_mismatched_value() {
        let mut acc = thermostat("Office");
        let err = acc
            .write(
                ServiceKind::Thermostat,
                CharacteristicKind::CurrentTemperature,
                CharacteristicValue::DisplayUnits(TemperatureDisplayUnits::Celsius),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { .. }));
    }

    #[test]
    fn on_set_needs_the_service() {
        let mut acc = Accessory::new("Bare");
        let err = acc
            .on_set(
                ServiceKind::Thermostat,
                CharacteristicKind::TargetTemperature,
                |_, _, _| Ok(()),
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::ServiceNotFound { .. }));
    }

    #[test]
    fn handlers_are_not_serialized() {
        let mut acc = thermostat("Cached");
        acc.on_identify(|_, _| Ok(()));
        acc.context.insert("something".into(), Value::from("Something"));

        let json = serde_json::to_string(&acc).unwrap();
        let back: Accessory = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, acc.id);
        assert_eq!(back.context.get("something"), Some(&Value::from("Something")));
        assert!(!back.has_identify_handler());
        let svc = back.service(ServiceKind::Thermostat).unwrap();
        assert!(svc.characteristics.iter().all(|c| !c.has_set_handler()));
    }

    #[test]
    fn missing_reachable_defaults_to_true() {
        let id = AccessoryId::derive("Old");
        let json = serde_json::json!({ "id": id, "display_name": "Old" });
        let acc: Accessory = serde_json::from_value(json).unwrap();
        assert!(acc.reachable);
        assert!(acc.services.is_empty());
    }
}
