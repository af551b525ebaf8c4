// ── Mesh link quality ──
//
// `iwinfo info` for the local end of each 802.11s interface, then one
// `iwinfo assoclist` lookup per candidate peer found in sibling snapshots.
// Peers that cannot be queried are left out; they reappear once reachable.

use std::collections::BTreeMap;

use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use wrtmon_api::{Error, UbusClient};

use crate::model::{MacAddress, MeshInterface, MeshLinkSnapshot, MeshPeer};
use crate::resolver::MeshPeerResolver;

pub const NAMESPACE: &str = "iwinfo";

const DEFAULT_SIGNAL: i64 = -100;
const DEFAULT_NOISE: i64 = 0;
const DEFAULT_BITRATE: i64 = -1;

#[derive(Debug, Deserialize)]
struct RawInfo {
    bssid: String,
    signal: Option<i64>,
    noise: Option<i64>,
    bitrate: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawAssoc {
    #[serde(rename = "mesh plink")]
    mesh_plink: Option<String>,
    signal: Option<i64>,
    noise: Option<i64>,
}

impl From<RawAssoc> for MeshPeer {
    fn from(raw: RawAssoc) -> Self {
        Self {
            active: raw.mesh_plink.as_deref() == Some("ESTAB"),
            signal: raw.signal.unwrap_or(DEFAULT_SIGNAL),
            noise: raw.noise.unwrap_or(DEFAULT_NOISE),
        }
    }
}

/// Probe every mesh interface.
///
/// An interface whose local info is unreachable or unsupported is left out
/// of the map; authentication and malformed responses abort the probe.
pub async fn fetch_mesh(
    client: &UbusClient,
    resolver: &MeshPeerResolver,
    interfaces: &[MeshInterface],
) -> Result<BTreeMap<String, MeshLinkSnapshot>, Error> {
    let mut links = BTreeMap::new();

    for iface in interfaces {
        match fetch_link(client, resolver, iface).await {
            Ok(link) => {
                links.insert(iface.ifname.clone(), link);
            }
            Err(e) if e.is_communication() || e.is_unsupported() => {
                warn!(ifname = %iface.ifname, error = %e, "mesh interface skipped");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(links)
}

async fn fetch_link(
    client: &UbusClient,
    resolver: &MeshPeerResolver,
    iface: &MeshInterface,
) -> Result<MeshLinkSnapshot, Error> {
    let info: RawInfo = client
        .call_as(NAMESPACE, "info", json!({ "device": iface.ifname }))
        .await?;

    let lookups = resolver.peers_for(&iface.mesh_id).into_iter().map(|mac| async move {
        let assoc = client
            .call_as::<RawAssoc>(
                NAMESPACE,
                "assoclist",
                json!({ "device": iface.ifname, "mac": mac.as_str() }),
            )
            .await;
        (mac, assoc)
    });

    let mut peers = BTreeMap::new();
    for (mac, assoc) in join_all(lookups).await {
        match assoc {
            Ok(raw) => {
                peers.insert(mac, MeshPeer::from(raw));
            }
            Err(e) if e.is_communication() || e.is_unsupported() => {
                debug!(ifname = %iface.ifname, peer = %mac, error = %e, "peer not associated");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(MeshLinkSnapshot {
        mac: MacAddress::new(&info.bssid),
        id: iface.mesh_id.clone(),
        signal: info.signal.unwrap_or(DEFAULT_SIGNAL),
        noise: info.noise.unwrap_or(DEFAULT_NOISE),
        bitrate: info.bitrate.unwrap_or(DEFAULT_BITRATE),
        peers,
    })
}
