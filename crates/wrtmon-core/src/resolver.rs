// ── Mesh peer resolution ──
//
// Joins mesh identifiers across independently polled devices: every
// device whose last snapshot carries a mesh link with the same id is a
// candidate peer. Reads are best-effort and may be one interval stale.

use std::sync::Arc;

use crate::model::MacAddress;
use crate::store::SnapshotRegistry;

/// Finds sibling mesh members through a read-only registry view.
#[derive(Clone)]
pub struct MeshPeerResolver {
    registry: Arc<dyn SnapshotRegistry>,
}

impl MeshPeerResolver {
    pub fn new(registry: Arc<dyn SnapshotRegistry>) -> Self {
        Self { registry }
    }

    /// Hardware addresses of every mesh link matching `mesh_id`, in
    /// registry order. The calling device is not excluded.
    ///
    /// Devices that have not published yet contribute nothing.
    pub fn peers_for(&self, mesh_id: &str) -> Vec<MacAddress> {
        self.registry
            .snapshots()
            .into_iter()
            .filter_map(|(_, snapshot)| snapshot)
            .flat_map(|snapshot| {
                snapshot
                    .mesh_members(mesh_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
