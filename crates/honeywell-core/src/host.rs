// ── Host runtime contract ──
//
// The narrow slice of the host the platform depends on. The host keeps its
// own registry keyed by (plugin name, platform name); the platform only
// hands it batches. Restoring cached accessories and the launch event flow
// the other way, through `Platform::restore` and
// `Platform::did_finish_launching`. Whenever the platform changes an
// accessory the host already holds, it hands the new state back through
// `update_platform_accessories`.

use crate::model::Accessory;

/// Registration calls the platform makes into the host.
///
/// All calls are assumed to succeed; an implementation that can fail
/// internally (e.g. a cache write) logs and carries on.
pub trait HostApi: Send + Sync {
    /// Register new accessories under `(plugin, platform)`.
    fn register_platform_accessories(&self, plugin: &str, platform: &str, accessories: &[Accessory]);

    /// Drop accessories from the `(plugin, platform)` registry.
    fn unregister_platform_accessories(
        &self,
        plugin: &str,
        platform: &str,
        accessories: &[Accessory],
    );

    /// Replace the host's copy of accessories it already holds.
    fn update_platform_accessories(&self, plugin: &str, platform: &str, accessories: &[Accessory]);
}
