// ── Per-device update orchestrator ──
//
// One `DeviceMonitor` per router. A cycle walks the probes strictly in
// order, assembles a `DeviceSnapshot` off to the side, and publishes it
// with a single pointer swap. A failed cycle publishes nothing.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use wrtmon_api::transport::{TlsMode, TransportConfig};
use wrtmon_api::{Error, UbusClient};

use crate::catalog::CapabilityCatalog;
use crate::config::{DeviceConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{DeviceSnapshot, WirelessTopology};
use crate::probes::{self, actions, board, clients, mesh, wan, wireless};
use crate::resolver::MeshPeerResolver;
use crate::store::SnapshotSlot;

// ── CycleState ───────────────────────────────────────────────────

/// Progress of the current (or last) update cycle, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    /// First cycle only.
    LoadingCatalog,
    FetchingInfo,
    FetchingWireless,
    FetchingClients,
    FetchingMesh,
    FetchingWan,
    Publishing,
    /// Last cycle ended with the router rejecting our credentials.
    AuthFailed,
    /// Last cycle ended with any other failure.
    CycleFailed,
}

// ── DeviceMonitor ────────────────────────────────────────────────

/// Polls one router and owns its published snapshot.
///
/// At most one cycle runs at a time; scheduled refreshes and
/// action-triggered refreshes queue on the same lock.
pub struct DeviceMonitor {
    id: String,
    client: UbusClient,
    catalog: CapabilityCatalog,
    resolver: MeshPeerResolver,
    slot: Arc<SnapshotSlot>,
    state: watch::Sender<CycleState>,
    cycle: Mutex<()>,
    poll_interval: Duration,
}

impl DeviceMonitor {
    /// Build a monitor for `config`, publishing into `slot`.
    ///
    /// No network traffic happens until the first cycle.
    pub fn new(
        config: &DeviceConfig,
        slot: Arc<SnapshotSlot>,
        resolver: MeshPeerResolver,
    ) -> Result<Self, CoreError> {
        let endpoint = config.endpoint()?;
        let client = UbusClient::new(
            endpoint,
            config.username.clone(),
            config.password.clone(),
            &build_transport(config),
        )?;
        let (state, _) = watch::channel(CycleState::Idle);

        Ok(Self {
            id: config.id.clone(),
            client,
            catalog: CapabilityCatalog::new(),
            resolver,
            slot,
            state,
            cycle: Mutex::new(()),
            poll_interval: config.poll_interval,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    /// Last published snapshot; `None` until a cycle succeeds.
    pub fn latest(&self) -> Option<Arc<DeviceSnapshot>> {
        self.slot.load()
    }

    pub fn last_published(&self) -> Option<DateTime<Utc>> {
        self.slot.last_published()
    }

    pub fn state(&self) -> CycleState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<CycleState> {
        self.state.subscribe()
    }

    // ── Cycles ───────────────────────────────────────────────────

    /// Run one full cycle and return the snapshot without publishing it.
    pub async fn produce_snapshot(&self) -> Result<DeviceSnapshot, CoreError> {
        let _cycle = self.cycle.lock().await;
        let snapshot = self.run_cycle().await?;
        self.set_state(CycleState::Idle);
        Ok(snapshot)
    }

    /// Run one full cycle and publish the result.
    ///
    /// On failure the previously published snapshot stays visible.
    pub async fn refresh(&self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        let _cycle = self.cycle.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<Arc<DeviceSnapshot>, CoreError> {
        let snapshot = Arc::new(self.run_cycle().await?);

        self.set_state(CycleState::Publishing);
        self.slot.publish(Arc::clone(&snapshot));
        info!(
            device = %self.id,
            access_points = snapshot.wireless.len(),
            clients = snapshot.client_total(),
            mesh_links = snapshot.mesh.len(),
            wan = snapshot.mwan3.len(),
            "snapshot published"
        );
        self.set_state(CycleState::Idle);

        Ok(snapshot)
    }

    async fn run_cycle(&self) -> Result<DeviceSnapshot, CoreError> {
        match self.collect().await {
            Ok(snapshot) => {
                debug!(device = %self.id, ?snapshot, "snapshot assembled");
                Ok(snapshot)
            }
            Err(e) => {
                let err = CoreError::from_api(&self.id, &e);
                self.set_state(if err.is_auth_failure() {
                    CycleState::AuthFailed
                } else {
                    CycleState::CycleFailed
                });
                warn!(device = %self.id, error = %e, "update cycle failed");
                Err(err)
            }
        }
    }

    async fn collect(&self) -> Result<DeviceSnapshot, Error> {
        if !self.catalog.is_loaded() {
            self.set_state(CycleState::LoadingCatalog);
            self.catalog.ensure_loaded(&self.client).await?;
        }

        self.set_state(CycleState::FetchingInfo);
        let info = board::fetch_board(&self.client).await?;

        self.set_state(CycleState::FetchingWireless);
        let topology = if self.catalog.supports(wireless::NAMESPACE) {
            probes::degrade(&self.id, "wireless", wireless::discover(&self.client).await)?
        } else {
            WirelessTopology::default()
        };
        debug!(
            device = %self.id,
            ap = topology.ap.len(),
            mesh = topology.mesh.len(),
            "wireless topology discovered"
        );

        self.set_state(CycleState::FetchingClients);
        let client_probes = topology.ap.iter().map(|ap| async move {
            let clients = clients::fetch_clients(&self.client, &ap.ifname).await?;
            Ok::<_, Error>((ap.ifname.clone(), clients))
        });
        let wireless: BTreeMap<_, _> = try_join_all(client_probes).await?.into_iter().collect();

        self.set_state(CycleState::FetchingMesh);
        let mesh = if self.catalog.supports(mesh::NAMESPACE) {
            mesh::fetch_mesh(&self.client, &self.resolver, &topology.mesh).await?
        } else {
            BTreeMap::new()
        };

        self.set_state(CycleState::FetchingWan);
        let mwan3 = if self.catalog.supports(wan::NAMESPACE) {
            probes::degrade(&self.id, "mwan3", wan::fetch_wan(&self.client).await)?
        } else {
            BTreeMap::new()
        };

        Ok(DeviceSnapshot {
            info,
            wireless,
            mesh,
            mwan3,
        })
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Open or close the WPS pairing window on `ifname`, then refresh so
    /// the new pairing state is published.
    pub async fn set_pairing(
        &self,
        ifname: &str,
        enable: bool,
    ) -> Result<Arc<DeviceSnapshot>, CoreError> {
        let _cycle = self.cycle.lock().await;
        actions::set_pairing(&self.client, ifname, enable)
            .await
            .map_err(|e| CoreError::from_api(&self.id, &e))?;
        self.refresh_locked().await
    }

    pub async fn reboot(&self) -> Result<(), CoreError> {
        let _cycle = self.cycle.lock().await;
        actions::reboot(&self.client)
            .await
            .map_err(|e| CoreError::from_api(&self.id, &e))
    }

    /// End the router session. Failures are logged, not returned.
    pub async fn close(&self) {
        let _cycle = self.cycle.lock().await;
        if let Err(e) = self.client.logout().await {
            warn!(device = %self.id, error = %e, "logout failed (non-fatal)");
        }
    }

    fn set_state(&self, state: CycleState) {
        self.state.send_replace(state);
    }
}

fn build_transport(config: &DeviceConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
