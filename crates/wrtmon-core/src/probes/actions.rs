// ── On-demand actions ──
//
// One-shot calls with no result transformation. The monitor refreshes the
// snapshot after a pairing change so the new WPS state shows up.

use serde_json::json;
use tracing::info;

use wrtmon_api::{Error, UbusClient};

use super::clients::hostapd_object;

/// Open or close the WPS push-button window on one AP interface.
pub async fn set_pairing(client: &UbusClient, ifname: &str, enable: bool) -> Result<(), Error> {
    let method = if enable { "wps_start" } else { "wps_cancel" };
    info!(ifname, method, "changing WPS pairing state");
    client
        .call(&hostapd_object(ifname), method, json!({}))
        .await
        .map(drop)
}

pub async fn reboot(client: &UbusClient) -> Result<(), Error> {
    info!(endpoint = %client.endpoint(), "rebooting device");
    client.call("system", "reboot", json!({})).await.map(drop)
}
