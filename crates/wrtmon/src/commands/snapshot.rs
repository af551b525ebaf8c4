//! `wrtmon snapshot`: one update cycle per device, rendered.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use wrtmon_core::{DeviceSnapshot, Fleet};

use crate::cli::{GlobalOpts, OutputFormat, SnapshotArgs};
use crate::error::CliError;
use crate::output;

// ── Report ──────────────────────────────────────────────────────────

/// A published snapshot tagged with its device and publish time.
#[derive(Serialize)]
pub(super) struct SnapshotReport<'a> {
    pub device: &'a str,
    pub published: Option<DateTime<Utc>>,
    pub snapshot: &'a DeviceSnapshot,
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ApRow {
    #[tabled(rename = "Interface")]
    ifname: String,
    #[tabled(rename = "Clients")]
    clients: usize,
    #[tabled(rename = "WPS")]
    pairing: &'static str,
}

#[derive(Tabled)]
struct MeshRow {
    #[tabled(rename = "Interface")]
    ifname: String,
    #[tabled(rename = "Mesh ID")]
    id: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Bitrate")]
    bitrate: String,
    #[tabled(rename = "Peers")]
    peers: String,
}

#[derive(Tabled)]
struct WanRow {
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Online")]
    online: String,
    #[tabled(rename = "Offline")]
    offline: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
}

fn fmt_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}

fn fmt_bitrate(kbits: i64) -> String {
    if kbits < 0 {
        "-".into()
    } else {
        format!("{} Mbit/s", kbits / 1000)
    }
}

/// Table-mode rendering of one report.
pub(super) fn detail(report: &SnapshotReport<'_>) -> String {
    let snapshot = report.snapshot;
    let info = &snapshot.info;
    let mut lines = vec![
        format!("Device:    {}", report.device),
        format!("Model:     {}", info.model),
        format!("Firmware:  {} {}", info.manufacturer, info.sw_version),
        format!("Hostname:  {}", info.hostname.as_deref().unwrap_or("-")),
        format!(
            "Published: {}",
            report.published.map_or_else(
                || "-".into(),
                |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
            )
        ),
        format!("Clients:   {}", snapshot.client_total()),
    ];

    if !snapshot.wireless.is_empty() {
        let rows: Vec<ApRow> = snapshot
            .wireless
            .iter()
            .map(|(ifname, ap)| ApRow {
                ifname: ifname.clone(),
                clients: ap.client_count,
                pairing: if ap.pairing_active { "active" } else { "-" },
            })
            .collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }

    if !snapshot.mesh.is_empty() {
        let rows: Vec<MeshRow> = snapshot
            .mesh
            .iter()
            .map(|(ifname, link)| {
                let active = link.peers.values().filter(|p| p.active).count();
                MeshRow {
                    ifname: ifname.clone(),
                    id: link.id.clone(),
                    mac: link.mac.to_string(),
                    signal: format!("{}/{} dBm", link.signal, link.noise),
                    bitrate: fmt_bitrate(link.bitrate),
                    peers: format!("{} ({active} active)", link.peers.len()),
                }
            })
            .collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }

    if !snapshot.mwan3.is_empty() {
        let rows: Vec<WanRow> = snapshot
            .mwan3
            .iter()
            .map(|(name, wan)| WanRow {
                name: name.clone(),
                status: wan.status.clone().unwrap_or_else(|| "-".into()),
                online: fmt_duration(wan.online_sec),
                offline: fmt_duration(wan.offline_sec),
                uptime: fmt_duration(wan.uptime_sec),
            })
            .collect();
        lines.push(String::new());
        lines.push(output::render_table(&rows));
    }

    lines.join("\n")
}

pub(super) fn render_report(
    format: OutputFormat,
    report: &SnapshotReport<'_>,
) -> Result<String, CliError> {
    output::render_single(format, report, detail)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    fleet: &Fleet,
    args: SnapshotArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let single = args.device.is_some();
    let results = match args.device {
        Some(id) => {
            let result = fleet.device(&id)?.refresh().await;
            vec![(id, result)]
        }
        None => fleet.refresh_all().await,
    };
    fleet.shutdown().await;

    let mut published = Vec::new();
    let mut first_error = None;
    for (id, result) in results {
        match result {
            Ok(snapshot) => {
                let at = fleet.device(&id)?.last_published();
                published.push((id, at, snapshot));
            }
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    let reports: Vec<SnapshotReport<'_>> = published
        .iter()
        .map(|(id, at, snapshot)| SnapshotReport {
            device: id,
            published: *at,
            snapshot,
        })
        .collect();

    if !reports.is_empty() {
        let out = match (single, reports.as_slice()) {
            (true, [report]) => render_report(global.output, report)?,
            _ => output::render_single(global.output, reports.as_slice(), |all| {
                all.iter().map(detail).collect::<Vec<_>>().join("\n\n")
            })?,
        };
        output::print_output(&out, global.quiet);
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use wrtmon_core::{ClientSnapshot, DeviceInfo, MacAddress, WanSnapshot};

    use super::*;

    fn sample() -> DeviceSnapshot {
        DeviceSnapshot {
            info: DeviceInfo {
                model: "Linksys E8450 (UBI)".into(),
                manufacturer: "OpenWrt".into(),
                sw_version: "23.05.3 r23809-234f1a2efa".into(),
                hostname: Some("gw".into()),
            },
            wireless: BTreeMap::from([(
                "phy0-ap0".to_owned(),
                ClientSnapshot {
                    client_count: 2,
                    macs: vec![
                        MacAddress::new("aa:bb:cc:00:11:22"),
                        MacAddress::new("aa:bb:cc:00:11:23"),
                    ],
                    pairing_active: true,
                },
            )]),
            mesh: BTreeMap::new(),
            mwan3: BTreeMap::from([(
                "wan".to_owned(),
                WanSnapshot {
                    offline_sec: 0,
                    online_sec: 7260,
                    uptime_sec: 7260,
                    online: true,
                    status: Some("online".into()),
                    up: Some(true),
                },
            )]),
        }
    }

    #[test]
    fn detail_lists_sections_present() {
        let snapshot = sample();
        let report = SnapshotReport {
            device: "gw",
            published: None,
            snapshot: &snapshot,
        };

        let text = detail(&report);

        assert!(text.contains("Clients:   2"));
        assert!(text.contains("phy0-ap0"));
        assert!(text.contains("active"));
        assert!(text.contains("2h01m"));
        assert!(!text.contains("Mesh ID"));
    }

    #[test]
    fn durations_are_compact() {
        assert_eq!(fmt_duration(42), "42s");
        assert_eq!(fmt_duration(125), "2m05s");
        assert_eq!(fmt_duration(3660), "1h01m");
    }

    #[test]
    fn unknown_bitrate_is_dash() {
        assert_eq!(fmt_bitrate(-1), "-");
        assert_eq!(fmt_bitrate(866_700), "866 Mbit/s");
    }
}
