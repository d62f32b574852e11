// ── Platform controller ──
//
// Mediates between the host's restore/launch hooks and the simulated
// thermostat accessories. Owns the ordered accessory collection and is the
// only thing that calls into the host registry.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::config::{PLATFORM_NAME, PLUGIN_NAME, PlatformConfig};
use crate::error::CoreError;
use crate::host::HostApi;
use crate::model::{
    Accessory, AccessoryId, CharacteristicKind, CharacteristicValue, Service, ServiceKind,
};
use crate::setup::{self, SetupContext, SetupRequest, SetupResponse};
use crate::store::{AccessoryCollection, AccessorySnapshot};

/// Subtype name of the thermostat service on new accessories.
const THERMOSTAT_SERVICE_NAME: &str = "Test Thermo";

/// Characteristics that get a logging set handler on newly added accessories.
const ADDED_HANDLERS: [CharacteristicKind; 5] = [
    CharacteristicKind::CurrentHeatingCoolingState,
    CharacteristicKind::TargetHeatingCoolingState,
    CharacteristicKind::CurrentTemperature,
    CharacteristicKind::TargetTemperature,
    CharacteristicKind::TemperatureDisplayUnits,
];

// ── Platform ─────────────────────────────────────────────────────

/// The platform instance the host drives.
///
/// Cheaply cloneable via `Arc<PlatformInner>`; the debug server and the
/// host harness each hold a clone.
#[derive(Clone)]
pub struct Platform {
    inner: Arc<PlatformInner>,
}

struct PlatformInner {
    config: PlatformConfig,
    /// Absent when the host exposes no registration API.
    host: Option<Arc<dyn HostApi>>,
    accessories: Mutex<AccessoryCollection>,
    launched: watch::Sender<bool>,
}

impl Platform {
    pub fn new(config: PlatformConfig, host: Option<Arc<dyn HostApi>>) -> Self {
        info!("HoneywellWifi Init");
        debug!(url = %config.url, name = ?config.name, "platform config");

        let (launched, _) = watch::channel(false);
        Self {
            inner: Arc::new(PlatformInner {
                config,
                host,
                accessories: Mutex::new(AccessoryCollection::new()),
                launched,
            }),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    pub fn has_host(&self) -> bool {
        self.inner.host.is_some()
    }

    // ── Host lifecycle hooks ─────────────────────────────────────

    /// Re-attach behavior to an accessory the host restored from its cache.
    ///
    /// Restoring the same id twice replaces the earlier entry in place. The
    /// host gets the now-reachable accessory back.
    pub async fn restore(&self, mut accessory: Accessory) {
        info!(accessory = %accessory.display_name, "Configure Accessory");

        accessory.update_reachability(true);
        accessory.on_identify(log_identify);

        if accessory.service(ServiceKind::Thermostat).is_some() {
            // The thermostat service always carries a target temperature
            // when it was created by `add`; older caches may not.
            if let Err(e) = accessory.on_set(
                ServiceKind::Thermostat,
                CharacteristicKind::TargetTemperature,
                log_set,
            ) {
                debug!(error = %e, "cached thermostat has no target temperature");
            }
        }

        let mut accessories = self.inner.accessories.lock().await;
        accessories.upsert(accessory.clone());
        self.sync_host(&[accessory]);
    }

    /// The host finished restoring cached accessories.
    pub fn did_finish_launching(&self) {
        info!("DidFinishLaunching");
        self.inner.launched.send_replace(true);
    }

    /// Observe whether the host has finished launching.
    pub fn launched(&self) -> watch::Receiver<bool> {
        self.inner.launched.subscribe()
    }

    // ── Lifecycle operations ─────────────────────────────────────

    /// Create, track, and register a new thermostat accessory.
    ///
    /// Returns `None` without touching anything when there is no host to
    /// register with. Adding a name that is already known returns the
    /// existing id and registers nothing.
    pub async fn add(&self, name: &str) -> Option<AccessoryId> {
        info!(accessory = %name, "Add Accessory");

        let Some(host) = &self.inner.host else {
            warn!(accessory = %name, "no host registration API, accessory not added");
            return None;
        };

        let id = AccessoryId::derive(name);
        let mut accessories = self.inner.accessories.lock().await;
        if accessories.contains(&id) {
            debug!(accessory = %name, uuid = %id, "accessory already registered");
            return Some(id);
        }

        let accessory = match build_thermostat(name) {
            Ok(accessory) => accessory,
            Err(e) => {
                warn!(accessory = %name, error = %e, "failed to build accessory");
                return None;
            }
        };

        accessories.upsert(accessory.clone());
        host.register_platform_accessories(PLUGIN_NAME, PLATFORM_NAME, &[accessory]);
        debug!(uuid = %id, count = accessories.len(), "accessory registered");

        Some(id)
    }

    /// Mark every known accessory unreachable, here and in the host.
    pub async fn update_reachability(&self) {
        info!("Update Reachability");
        let mut accessories = self.inner.accessories.lock().await;
        accessories.modify_all(|a| a.update_reachability(false));
        self.sync_host(&accessories.to_vec());
    }

    /// Unregister every known accessory in one batch and forget them.
    ///
    /// Returns how many accessories were removed.
    pub async fn remove(&self) -> usize {
        info!("Remove Accessory");

        let Some(host) = &self.inner.host else {
            warn!("no host registration API, nothing removed");
            return 0;
        };

        let mut accessories = self.inner.accessories.lock().await;
        let batch = accessories.to_vec();
        host.unregister_platform_accessories(PLUGIN_NAME, PLATFORM_NAME, &batch);
        accessories.clear();

        batch.len()
    }

    // ── Host-side requests ───────────────────────────────────────

    /// Route an identify request to an accessory.
    pub async fn identify(&self, id: &AccessoryId, paired: bool) -> Result<(), CoreError> {
        let accessories = self.inner.accessories.lock().await;
        accessories
            .get(id)
            .ok_or_else(|| CoreError::AccessoryNotFound {
                identifier: id.to_string(),
            })?
            .identify(paired)
    }

    /// Route a characteristic write to an accessory's thermostat service.
    ///
    /// Returns the accessory as stored after the write.
    pub async fn set_characteristic(
        &self,
        id: &AccessoryId,
        kind: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<Accessory, CoreError> {
        let mut accessories = self.inner.accessories.lock().await;
        let updated = accessories
            .modify(id, |a| {
                a.write(ServiceKind::Thermostat, kind, value)
                    .map(|()| a.clone())
            })
            .ok_or_else(|| CoreError::AccessoryNotFound {
                identifier: id.to_string(),
            })??;
        self.sync_host(std::slice::from_ref(&updated));
        Ok(updated)
    }

    /// One round of the interactive configuration handshake.
    pub async fn configuration_request(
        &self,
        context: &mut SetupContext,
        request: Option<&SetupRequest>,
    ) -> SetupResponse {
        debug!(context = ?context, request = ?request, "configuration request");

        if let Some(name) = request.and_then(|r| r.input("name")) {
            self.add(name).await;
            return SetupResponse::Save(setup::platform_save());
        }

        context.insert("ts".into(), "Hello".into());
        SetupResponse::Interface(setup::add_accessory_form())
    }

    // ── Observation ──────────────────────────────────────────────

    /// Current accessories, in registration order.
    pub async fn accessories(&self) -> AccessorySnapshot {
        self.inner.accessories.lock().await.snapshot()
    }

    pub async fn accessory_count(&self) -> usize {
        self.inner.accessories.lock().await.len()
    }

    /// Counter bumped on every collection mutation.
    pub async fn revision(&self) -> u64 {
        self.inner.accessories.lock().await.version()
    }

    /// Subscribe to collection changes.
    pub async fn subscribe(&self) -> watch::Receiver<AccessorySnapshot> {
        self.inner.accessories.lock().await.subscribe()
    }

    /// Hand changed accessories back to the host, if there is one.
    fn sync_host(&self, accessories: &[Accessory]) {
        if let Some(host) = &self.inner.host {
            host.update_platform_accessories(PLUGIN_NAME, PLATFORM_NAME, accessories);
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_thermostat(name: &str) -> Result<Accessory, CoreError> {
    let mut accessory = Accessory::new(name);
    accessory.on_identify(log_identify);
    accessory.add_service(Service::thermostat(THERMOSTAT_SERVICE_NAME)?);
    for kind in ADDED_HANDLERS {
        accessory.on_set(ServiceKind::Thermostat, kind, log_set)?;
    }
    Ok(accessory)
}

#[allow(clippy::unnecessary_wraps)]
fn log_identify(name: &str, paired: bool) -> Result<(), CoreError> {
    info!(accessory = %name, paired, "Identify!!!");
    Ok(())
}

/// Logs the write and completes immediately; there is no device to talk to.
#[allow(clippy::unnecessary_wraps)]
fn log_set(
    name: &str,
    kind: CharacteristicKind,
    value: &CharacteristicValue,
) -> Result<(), CoreError> {
    info!(accessory = %name, "{kind} -> {value}");
    Ok(())
}
