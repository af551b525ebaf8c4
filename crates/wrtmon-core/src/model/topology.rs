// ── Wireless topology ──
//
// Discovered fresh every cycle from `network.wireless status`.

use serde::{Deserialize, Serialize};

/// An interface running in access-point mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApInterface {
    pub ifname: String,
    /// Bridged network (first entry of the interface's `network` list).
    pub network: Option<String>,
}

/// An interface running in 802.11s mesh mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshInterface {
    pub ifname: String,
    pub network: Option<String>,
    pub mesh_id: String,
}

/// AP and mesh interfaces in radio/interface order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessTopology {
    pub ap: Vec<ApInterface>,
    pub mesh: Vec<MeshInterface>,
}

impl WirelessTopology {
    pub fn is_empty(&self) -> bool {
        self.ap.is_empty() && self.mesh.is_empty()
    }
}
