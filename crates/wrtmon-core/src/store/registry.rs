// ── Cross-device snapshot registry ──
//
// Insertion-ordered map of device id → publish cell. Devices only ever
// write their own slot; the registry hands everyone else a read-only view.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use super::slot::SnapshotSlot;
use crate::error::CoreError;
use crate::model::DeviceSnapshot;

/// Read-only view over every known device's last published snapshot.
///
/// Implementations must not block on a device's in-flight update.
pub trait SnapshotRegistry: Send + Sync {
    /// `(device id, last snapshot)` pairs in registry order.
    fn snapshots(&self) -> Vec<(String, Option<Arc<DeviceSnapshot>>)>;
}

/// Default registry backing a [`Fleet`](crate::Fleet).
#[derive(Default)]
pub struct SnapshotBoard {
    slots: RwLock<IndexMap<String, Arc<SnapshotSlot>>>,
}

impl SnapshotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device and return its publish cell.
    pub fn register(&self, id: &str) -> Result<Arc<SnapshotSlot>, CoreError> {
        let mut slots = self.slots.write().expect("registry lock poisoned");
        if slots.contains_key(id) {
            return Err(CoreError::DuplicateDevice { id: id.to_owned() });
        }
        let slot = Arc::new(SnapshotSlot::new());
        slots.insert(id.to_owned(), Arc::clone(&slot));
        Ok(slot)
    }

    pub fn slot(&self, id: &str) -> Option<Arc<SnapshotSlot>> {
        self.slots
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .cloned()
    }

    /// Last published snapshot of `id`.
    pub fn latest(&self, id: &str) -> Option<Arc<DeviceSnapshot>> {
        self.slot(id).and_then(|slot| slot.load())
    }

    pub fn ids(&self) -> Vec<String> {
        self.slots
            .read()
            .expect("registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotRegistry for SnapshotBoard {
    fn snapshots(&self) -> Vec<(String, Option<Arc<DeviceSnapshot>>)> {
        self.slots
            .read()
            .expect("registry lock poisoned")
            .iter()
            .map(|(id, slot)| (id.clone(), slot.load()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::DeviceInfo;

    fn empty_snapshot(model: &str) -> Arc<DeviceSnapshot> {
        Arc::new(DeviceSnapshot {
            info: DeviceInfo {
                model: model.into(),
                manufacturer: "OpenWrt".into(),
                sw_version: "23.05.3 r23809".into(),
                hostname: None,
            },
            wireless: BTreeMap::new(),
            mesh: BTreeMap::new(),
            mwan3: BTreeMap::new(),
        })
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let board = SnapshotBoard::new();
        board.register("ap1").expect("first registration");
        assert!(matches!(
            board.register("ap1"),
            Err(CoreError::DuplicateDevice { .. })
        ));
    }

    #[test]
    fn snapshots_follow_registration_order() {
        let board = SnapshotBoard::new();
        for id in ["zeta", "alpha", "mid"] {
            board.register(id).expect("registration");
        }
        let ids: Vec<String> = board.snapshots().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let board = SnapshotBoard::new();
        let slot = board.register("ap1").expect("registration");
        assert!(board.latest("ap1").is_none());
        assert!(slot.last_published().is_none());

        slot.publish(empty_snapshot("first"));
        let held = board.latest("ap1").expect("published");
        slot.publish(empty_snapshot("second"));

        assert_eq!(held.info.model, "first");
        assert_eq!(
            board.latest("ap1").expect("published").info.model,
            "second"
        );
        assert!(slot.last_published().is_some());
    }
}
