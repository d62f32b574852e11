// ── Local host harness ──
//
// Stands in for the bridge runtime: keeps the per-(plugin, platform)
// accessory registry, mirrors it to a JSON cache on disk, and replays the
// cache into the platform at launch.

use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use honeywell_core::{Accessory, AccessoryId, HostApi, PLATFORM_NAME, PLUGIN_NAME, Platform};

/// Cache file name under `<storage>/accessories/`.
const CACHE_FILE: &str = "cachedAccessories.json";

/// `(plugin name, platform name)`.
pub type RegistryKey = (String, String);

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read accessory cache {path}: {source}")]
    ReadCache {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("accessory cache {path} is corrupt: {source}")]
    CorruptCache {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write accessory cache {path}: {source}")]
    WriteCache {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// One accessory as stored in the cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAccessory {
    pub plugin: String,
    pub platform: String,
    #[serde(flatten)]
    pub accessory: Accessory,
}

// ── LocalHost ────────────────────────────────────────────────────────

pub struct LocalHost {
    registry: DashMap<RegistryKey, IndexMap<AccessoryId, Accessory>>,
    cache_path: PathBuf,
}

impl LocalHost {
    /// Open the registry under `storage_dir`, loading the cache if present.
    pub fn open(storage_dir: &Path) -> Result<Self, HostError> {
        let cache_path = storage_dir.join("accessories").join(CACHE_FILE);
        let registry = DashMap::new();

        for entry in read_cache(&cache_path)? {
            registry
                .entry((entry.plugin, entry.platform))
                .or_insert_with(IndexMap::new)
                .insert(entry.accessory.id, entry.accessory);
        }

        info!(path = %cache_path.display(), "accessory cache opened");
        Ok(Self {
            registry,
            cache_path,
        })
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Accessories registered under `(plugin, platform)`, in order.
    pub fn cached(&self, plugin: &str, platform: &str) -> Vec<Accessory> {
        self.registry
            .get(&(plugin.to_owned(), platform.to_owned()))
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every cached accessory, grouped by registry key.
    pub fn entries(&self) -> Vec<CachedAccessory> {
        let mut keys: Vec<RegistryKey> = self.registry.iter().map(|e| e.key().clone()).collect();
        keys.sort();

        keys.into_iter()
            .flat_map(|(plugin, platform)| {
                self.cached(&plugin, &platform)
                    .into_iter()
                    .map(move |accessory| CachedAccessory {
                        plugin: plugin.clone(),
                        platform: platform.clone(),
                        accessory,
                    })
            })
            .collect()
    }

    /// Restore this plugin's cached accessories, then signal launch.
    ///
    /// Returns how many accessories were restored.
    pub async fn launch(&self, platform: &Platform) -> usize {
        let cached = self.cached(PLUGIN_NAME, PLATFORM_NAME);
        let count = cached.len();
        for accessory in cached {
            platform.restore(accessory).await;
        }
        platform.did_finish_launching();
        count
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist(&self) {
        if let Err(e) = self.write_cache() {
            warn!(error = %e, "accessory cache not saved");
        }
    }

    fn write_cache(&self) -> Result<(), HostError> {
        let write_err = |source: io::Error| HostError::WriteCache {
            path: self.cache_path.display().to_string(),
            source,
        };

        let body = serde_json::to_vec_pretty(&self.entries()).map_err(|e| write_err(e.into()))?;

        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = self.cache_path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(write_err)?;
        std::fs::rename(&tmp, &self.cache_path).map_err(write_err)?;

        debug!(path = %self.cache_path.display(), "accessory cache saved");
        Ok(())
    }
}

fn read_cache(path: &Path) -> Result<Vec<CachedAccessory>, HostError> {
    let body = match std::fs::read(path) {
        Ok(body) => body,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(HostError::ReadCache {
                path: path.display().to_string(),
                source,
            });
        }
    };

    serde_json::from_slice(&body).map_err(|source| HostError::CorruptCache {
        path: path.display().to_string(),
        source,
    })
}

// ── HostApi ──────────────────────────────────────────────────────────

impl HostApi for LocalHost {
    fn register_platform_accessories(&self, plugin: &str, platform: &str, accessories: &[Accessory]) {
        {
            let mut entries = self
                .registry
                .entry((plugin.to_owned(), platform.to_owned()))
                .or_insert_with(IndexMap::new);
            for accessory in accessories {
                debug!(accessory = %accessory.display_name, uuid = %accessory.id, "registering");
                entries.insert(accessory.id, accessory.clone());
            }
        }
        self.persist();
    }

    fn unregister_platform_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[Accessory],
    ) {
        {
            let key = (plugin.to_owned(), platform.to_owned());
            if let Some(mut entries) = self.registry.get_mut(&key) {
                for accessory in accessories {
                    debug!(accessory = %accessory.display_name, uuid = %accessory.id, "unregistering");
                    entries.shift_remove(&accessory.id);
                }
            }
        }
        self.persist();
    }

    fn update_platform_accessories(&self, plugin: &str, platform: &str, accessories: &[Accessory]) {
        {
            let key = (plugin.to_owned(), platform.to_owned());
            let Some(mut entries) = self.registry.get_mut(&key) else {
                debug!(plugin, platform, "update for an empty registry ignored");
                return;
            };
            for accessory in accessories {
                match entries.get_mut(&accessory.id) {
                    Some(slot) => *slot = accessory.clone(),
                    None => debug!(uuid = %accessory.id, "update for unregistered accessory ignored"),
                }
            }
        }
        self.persist();
    }
}
