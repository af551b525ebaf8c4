// ── Access-point clients ──
//
// Per-interface `hostapd.<ifname>` object: associated stations plus WPS
// push-button state. Not capability-gated; a missing hostapd object for a
// discovered AP is a hard failure.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use wrtmon_api::{Error, UbusClient};

use crate::model::{ClientSnapshot, MacAddress};

/// ubus object name serving one AP interface.
pub fn hostapd_object(ifname: &str) -> String {
    format!("hostapd.{ifname}")
}

#[derive(Debug, Deserialize)]
struct RawClients {
    #[serde(default)]
    clients: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawWpsStatus {
    #[serde(default)]
    pbc_status: Option<String>,
}

pub async fn fetch_clients(client: &UbusClient, ifname: &str) -> Result<ClientSnapshot, Error> {
    let object = hostapd_object(ifname);
    let stations: RawClients = client.call_as(&object, "get_clients", json!({})).await?;
    let wps: RawWpsStatus = client.call_as(&object, "wps_status", json!({})).await?;
    Ok(assemble(stations, &wps))
}

fn assemble(stations: RawClients, wps: &RawWpsStatus) -> ClientSnapshot {
    let macs: Vec<MacAddress> = stations.clients.keys().map(MacAddress::new).collect();
    ClientSnapshot {
        client_count: macs.len(),
        macs,
        pairing_active: wps.pbc_status.as_deref() == Some("Active"),
    }
}
