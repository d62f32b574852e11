// ── Accessory storage ──

mod collection;

pub(crate) use collection::AccessoryCollection;
pub use collection::AccessorySnapshot;
