// ── Board identity ──
//
// `system board` is unconditional and doubles as the liveness check: any
// failure here aborts the cycle.

use serde::Deserialize;
use serde_json::json;

use wrtmon_api::{Error, UbusClient};

use crate::model::DeviceInfo;

#[derive(Debug, Deserialize)]
struct RawBoard {
    model: String,
    #[serde(default)]
    hostname: Option<String>,
    release: RawRelease,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    distribution: String,
    version: String,
    revision: String,
}

impl From<RawBoard> for DeviceInfo {
    fn from(raw: RawBoard) -> Self {
        Self {
            model: raw.model,
            manufacturer: raw.release.distribution,
            sw_version: format!("{} {}", raw.release.version, raw.release.revision),
            hostname: raw.hostname,
        }
    }
}

pub async fn fetch_board(client: &UbusClient) -> Result<DeviceInfo, Error> {
    let raw: RawBoard = client.call_as("system", "board", json!({})).await?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sw_version_joins_version_and_revision() {
        let raw: RawBoard = serde_json::from_value(json!({
            "kernel": "5.15.150",
            "hostname": "OpenWrt",
            "system": "ARMv8 Processor rev 4",
            "model": "Linksys E8450 (UBI)",
            "board_name": "linksys,e8450-ubi",
            "release": {
                "distribution": "OpenWrt",
                "version": "23.05.3",
                "revision": "r23809-234f1a2efa",
                "target": "mediatek/mt7622"
            }
        }))
        .expect("board payload");

        let info = DeviceInfo::from(raw);

        assert_eq!(info.model, "Linksys E8450 (UBI)");
        assert_eq!(info.manufacturer, "OpenWrt");
        assert_eq!(info.sw_version, "23.05.3 r23809-234f1a2efa");
        assert_eq!(info.hostname.as_deref(), Some("OpenWrt"));
    }

    #[test]
    fn missing_release_is_rejected() {
        let raw = serde_json::from_value::<RawBoard>(json!({ "model": "x" }));
        assert!(raw.is_err());
    }
}
