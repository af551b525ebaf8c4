// ── Polling fleet ──
//
// Owns every device monitor plus the shared snapshot board, and drives one
// independent polling task per device. Devices only meet through the
// board's read-only view when resolving mesh peers.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::DeviceSnapshot;
use crate::monitor::DeviceMonitor;
use crate::resolver::MeshPeerResolver;
use crate::store::{SnapshotBoard, SnapshotRegistry};

/// A set of routers polled side by side.
pub struct Fleet {
    board: Arc<SnapshotBoard>,
    monitors: Vec<Arc<DeviceMonitor>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Fleet {
    /// Build one monitor per config, in order. Ids must be unique.
    pub fn new(configs: &[DeviceConfig]) -> Result<Self, CoreError> {
        let board = Arc::new(SnapshotBoard::new());
        let resolver = MeshPeerResolver::new(Arc::clone(&board) as Arc<dyn SnapshotRegistry>);

        let mut monitors = Vec::with_capacity(configs.len());
        for config in configs {
            let slot = board.register(&config.id)?;
            let monitor = DeviceMonitor::new(config, slot, resolver.clone())?;
            monitors.push(Arc::new(monitor));
        }

        Ok(Self {
            board,
            monitors,
            cancel: CancellationToken::new(),
            task_handles: Mutex::new(Vec::new()),
        })
    }

    pub fn board(&self) -> &Arc<SnapshotBoard> {
        &self.board
    }

    /// Monitors in registration order.
    pub fn monitors(&self) -> &[Arc<DeviceMonitor>] {
        &self.monitors
    }

    pub fn device(&self, id: &str) -> Result<&Arc<DeviceMonitor>, CoreError> {
        self.monitors
            .iter()
            .find(|monitor| monitor.id() == id)
            .ok_or_else(|| CoreError::DeviceNotFound { id: id.to_owned() })
    }

    /// One cycle per device, sequentially in registration order, so later
    /// devices already see earlier devices' fresh mesh links.
    pub async fn refresh_all(&self) -> Vec<(String, Result<Arc<DeviceSnapshot>, CoreError>)> {
        let mut results = Vec::with_capacity(self.monitors.len());
        for monitor in &self.monitors {
            results.push((monitor.id().to_owned(), monitor.refresh().await));
        }
        results
    }

    // ── Background polling ───────────────────────────────────────

    /// Spawn a polling task per device. The first cycle runs immediately.
    ///
    /// A device whose credentials are rejected stops polling until the
    /// fleet is rebuilt; other failures are retried on the next tick.
    pub async fn start(&self) {
        let mut handles = self.task_handles.lock().await;
        for monitor in &self.monitors {
            if monitor.poll_interval().is_zero() {
                warn!(device = monitor.id(), "poll interval is zero, not polling");
                continue;
            }
            let monitor = Arc::clone(monitor);
            let cancel = self.cancel.child_token();
            handles.push(tokio::spawn(poll_task(monitor, cancel)));
        }
        info!(devices = handles.len(), "polling started");
    }

    /// Stop polling, wait for in-flight cycles, and end every session.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let mut handles = self.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        for monitor in &self.monitors {
            monitor.close().await;
        }
        debug!("fleet shut down");
    }
}

async fn poll_task(monitor: Arc<DeviceMonitor>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(monitor.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => match monitor.refresh().await {
                Err(e) if e.is_auth_failure() => {
                    warn!(device = monitor.id(), error = %e, "credentials rejected, polling stopped");
                    break;
                }
                Err(e) => debug!(device = monitor.id(), error = %e, "poll cycle failed"),
                Ok(_) => {}
            },
        }
    }
}
