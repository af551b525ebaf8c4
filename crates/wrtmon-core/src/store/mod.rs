// ── Snapshot storage ──

mod registry;
mod slot;

pub use registry::{SnapshotBoard, SnapshotRegistry};
pub use slot::SnapshotSlot;
