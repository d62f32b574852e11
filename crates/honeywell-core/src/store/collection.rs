// ── Ordered reactive accessory collection ──
//
// Insertion-ordered storage keyed by accessory id, with push-based change
// notification via `watch` channels. Owned by the platform behind its lock.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::{Accessory, AccessoryId};

/// Snapshot handed to subscribers.
pub type AccessorySnapshot = Arc<Vec<Arc<Accessory>>>;

/// Ordered collection of known accessories.
///
/// Every mutation bumps a version counter and rebuilds the snapshot that
/// subscribers receive. Order is registration order; replacing an
/// existing id keeps its position.
pub(crate) struct AccessoryCollection {
    entries: IndexMap<AccessoryId, Accessory>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation.
    snapshot: watch::Sender<AccessorySnapshot>,
}

impl AccessoryCollection {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            entries: IndexMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or replace an accessory. Returns `true` if the id was new.
    pub(crate) fn upsert(&mut self, accessory: Accessory) -> bool {
        let is_new = self.entries.insert(accessory.id, accessory).is_none();
        self.publish();
        is_new
    }

    pub(crate) fn contains(&self, id: &AccessoryId) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn get(&self, id: &AccessoryId) -> Option<&Accessory> {
        self.entries.get(id)
    }

    /// Mutate one accessory in place and publish the change.
    pub(crate) fn modify<R>(
        &mut self,
        id: &AccessoryId,
        f: impl FnOnce(&mut Accessory) -> R,
    ) -> Option<R> {
        let out = f(self.entries.get_mut(id)?);
        self.publish();
        Some(out)
    }

    /// Mutate every accessory in order and publish once.
    pub(crate) fn modify_all(&mut self, mut f: impl FnMut(&mut Accessory)) {
        for accessory in self.entries.values_mut() {
            f(accessory);
        }
        self.publish();
    }

    /// Clone out every accessory, in order.
    pub(crate) fn to_vec(&self) -> Vec<Accessory> {
        self.entries.values().cloned().collect()
    }

    /// Remove every accessory.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.publish();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn snapshot(&self) -> AccessorySnapshot {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<AccessorySnapshot> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn publish(&self) {
        let values: Vec<Arc<Accessory>> = self.entries.values().cloned().map(Arc::new).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}
