// ── Device snapshot types ──
//
// One `DeviceSnapshot` is the complete result of a polling cycle. It is
// built off to the side and published whole; nothing in here is mutated
// after publication.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mac::MacAddress;

/// Board identity from `system board`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub model: String,
    /// Firmware distribution, e.g. "OpenWrt".
    pub manufacturer: String,
    /// `"<version> <revision>"`, e.g. "23.05.3 r23809-234f1a2efa".
    pub sw_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Clients associated with one access-point interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    pub client_count: usize,
    pub macs: Vec<MacAddress>,
    /// WPS push-button pairing window is open.
    pub pairing_active: bool,
}

/// Link quality towards one mesh peer, as seen from the local interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshPeer {
    /// Peer link is established (`mesh plink == ESTAB`).
    pub active: bool,
    pub signal: i64,
    pub noise: i64,
}

/// One 802.11s mesh interface and its peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshLinkSnapshot {
    /// Own hardware address (interface BSSID).
    pub mac: MacAddress,
    /// Mesh identifier shared by all members of the mesh.
    pub id: String,
    pub signal: i64,
    pub noise: i64,
    pub bitrate: i64,
    pub peers: BTreeMap<MacAddress, MeshPeer>,
}

/// Health of one enabled mwan3 interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WanSnapshot {
    pub offline_sec: u64,
    pub online_sec: u64,
    pub uptime_sec: u64,
    pub online: bool,
    /// Raw mwan3 status label ("online", "offline", "disabled", ...).
    pub status: Option<String>,
    pub up: Option<bool>,
}

/// Complete, immutable result of one polling cycle.
///
/// All four sections are always present; optional features that the
/// device lacks show up as empty maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub info: DeviceInfo,
    /// Access-point interface name → connected clients.
    pub wireless: BTreeMap<String, ClientSnapshot>,
    /// Mesh interface name → link quality.
    pub mesh: BTreeMap<String, MeshLinkSnapshot>,
    /// mwan3 interface name → health.
    pub mwan3: BTreeMap<String, WanSnapshot>,
}

impl DeviceSnapshot {
    /// Total associated clients across all access points.
    pub fn client_total(&self) -> usize {
        self.wireless.values().map(|ap| ap.client_count).sum()
    }

    /// Own addresses of every mesh link that belongs to `mesh_id`.
    pub fn mesh_members<'a>(&'a self, mesh_id: &'a str) -> impl Iterator<Item = &'a MacAddress> {
        self.mesh
            .values()
            .filter(move |link| link.id == mesh_id)
            .map(|link| &link.mac)
    }
}
