// ── Multi-WAN health ──

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;

use wrtmon_api::{Error, UbusClient};

use crate::model::WanSnapshot;

pub const NAMESPACE: &str = "mwan3";

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(default)]
    interfaces: BTreeMap<String, RawWan>,
}

#[derive(Debug, Deserialize)]
struct RawWan {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    offline: u64,
    #[serde(default)]
    online: u64,
    #[serde(default)]
    uptime: u64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    up: Option<bool>,
}

pub async fn fetch_wan(client: &UbusClient) -> Result<BTreeMap<String, WanSnapshot>, Error> {
    let raw: RawStatus = client
        .call_as(NAMESPACE, "status", json!({ "section": "interfaces" }))
        .await?;
    Ok(enabled_interfaces(raw))
}

/// Disabled interfaces never reach the snapshot.
fn enabled_interfaces(raw: RawStatus) -> BTreeMap<String, WanSnapshot> {
    raw.interfaces
        .into_iter()
        .filter(|(_, iface)| iface.enabled)
        .map(|(name, iface)| {
            let snapshot = WanSnapshot {
                offline_sec: iface.offline,
                online_sec: iface.online,
                uptime_sec: iface.uptime,
                online: iface.status.as_deref() == Some("online"),
                status: iface.status,
                up: iface.up,
            };
            (name, snapshot)
        })
        .collect()
}
