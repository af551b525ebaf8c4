// ── Wireless interface discovery ──
//
// Walks `network.wireless status` radio by radio and sorts interfaces into
// access points and mesh points. Rebuilt every cycle.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use wrtmon_api::{Error, UbusClient};

use crate::model::{ApInterface, MeshInterface, WirelessTopology};

pub const NAMESPACE: &str = "network.wireless";

#[derive(Debug, Deserialize)]
struct RawRadio {
    #[serde(default)]
    interfaces: Vec<RawInterface>,
}

#[derive(Debug, Deserialize)]
struct RawInterface {
    #[serde(default)]
    ifname: Option<String>,
    #[serde(default)]
    config: RawInterfaceConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawInterfaceConfig {
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    network: OneOrMany,
    #[serde(default)]
    mesh_id: Option<String>,
}

/// netifd reports `network` as a list, older builds as a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl OneOrMany {
    fn first(self) -> Option<String> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(v) => v.into_iter().next(),
        }
    }
}

pub async fn discover(client: &UbusClient) -> Result<WirelessTopology, Error> {
    let radios: BTreeMap<String, RawRadio> =
        client.call_as(NAMESPACE, "status", json!({})).await?;
    Ok(sort_interfaces(radios))
}

fn sort_interfaces(radios: BTreeMap<String, RawRadio>) -> WirelessTopology {
    let mut topology = WirelessTopology::default();

    for (radio, item) in radios {
        for iface in item.interfaces {
            let Some(ifname) = iface.ifname else {
                debug!(radio, "interface without ifname, radio likely down");
                continue;
            };
            let network = iface.config.network.first();
            match iface.config.mode.as_deref() {
                Some("ap") => topology.ap.push(ApInterface { ifname, network }),
                Some("mesh") => match iface.config.mesh_id {
                    Some(mesh_id) => topology.mesh.push(MeshInterface {
                        ifname,
                        network,
                        mesh_id,
                    }),
                    None => debug!(ifname, "mesh interface without mesh_id"),
                },
                _ => {}
            }
        }
    }

    topology
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn interfaces_are_sorted_by_mode() {
        let radios: BTreeMap<String, RawRadio> = serde_json::from_value(json!({
            "radio0": {
                "up": true,
                "interfaces": [
                    { "section": "default_radio0", "ifname": "phy0-ap0",
                      "config": { "mode": "ap", "ssid": "home", "network": ["lan"] } },
                    { "section": "mesh0", "ifname": "phy0-mesh0",
                      "config": { "mode": "mesh", "mesh_id": "backhaul", "network": ["lan"] } }
                ]
            },
            "radio1": {
                "up": true,
                "interfaces": [
                    { "section": "sta", "ifname": "phy1-sta0",
                      "config": { "mode": "sta", "network": ["wwan"] } },
                    { "section": "guest", "ifname": "phy1-ap0",
                      "config": { "mode": "ap", "network": "guest" } }
                ]
            }
        }))
        .expect("wireless payload");

        let topology = sort_interfaces(radios);

        assert_eq!(
            topology.ap,
            vec![
                ApInterface {
                    ifname: "phy0-ap0".into(),
                    network: Some("lan".into()),
                },
                ApInterface {
                    ifname: "phy1-ap0".into(),
                    network: Some("guest".into()),
                },
            ]
        );
        assert_eq!(
            topology.mesh,
            vec![MeshInterface {
                ifname: "phy0-mesh0".into(),
                network: Some("lan".into()),
                mesh_id: "backhaul".into(),
            }]
        );
    }

    #[test]
    fn down_radio_interfaces_are_skipped() {
        let radios: BTreeMap<String, RawRadio> = serde_json::from_value(json!({
            "radio0": {
                "up": false,
                "interfaces": [ { "section": "default_radio0", "config": { "mode": "ap" } } ]
            }
        }))
        .expect("wireless payload");

        assert!(sort_interfaces(radios).is_empty());
    }

    #[test]
    fn mesh_interface_without_mesh_id_is_dropped() {
        let radios: BTreeMap<String, RawRadio> = serde_json::from_value(json!({
            "radio0": {
                "up": true,
                "interfaces": [
                    { "section": "mesh0", "ifname": "phy0-mesh0", "config": { "mode": "mesh" } }
                ]
            }
        }))
        .expect("wireless payload");

        let topology = sort_interfaces(radios);

        assert!(topology.mesh.is_empty());
        assert!(topology.ap.is_empty());
    }
}
