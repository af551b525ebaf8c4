// ── Per-device publish cell ──
//
// Single writer (the device's own cycle), many readers (consumers and
// sibling devices resolving mesh peers). Publication is one pointer swap,
// so a reader sees either the previous snapshot or the new one.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::DeviceSnapshot;

/// Latest published snapshot of one device.
pub struct SnapshotSlot {
    current: ArcSwapOption<DeviceSnapshot>,
    last_published: watch::Sender<Option<DateTime<Utc>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        let (last_published, _) = watch::channel(None);
        Self {
            current: ArcSwapOption::empty(),
            last_published,
        }
    }

    /// The last published snapshot, `None` before the first successful cycle.
    /// Never blocks on an in-flight update.
    pub fn load(&self) -> Option<Arc<DeviceSnapshot>> {
        self.current.load_full()
    }

    /// Atomically replace the visible snapshot.
    pub(crate) fn publish(&self, snapshot: Arc<DeviceSnapshot>) {
        self.current.store(Some(snapshot));
        self.last_published.send_replace(Some(Utc::now()));
    }

    /// When the visible snapshot was published.
    pub fn last_published(&self) -> Option<DateTime<Utc>> {
        *self.last_published.borrow()
    }

    /// Change notification for publish events.
    pub fn subscribe(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_published.subscribe()
    }
}

impl Default for SnapshotSlot {
    fn default() -> Self {
        Self::new()
    }
}
