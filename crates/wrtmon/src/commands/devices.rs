//! `wrtmon devices`: configured routers, no network traffic.

use serde::Serialize;
use tabled::Tabled;

use wrtmon_core::{DeviceConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct DeviceEntry {
    id: String,
    endpoint: String,
    username: String,
    interval_secs: u64,
    timeout_secs: u64,
    tls: &'static str,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Interval")]
    interval: String,
    #[tabled(rename = "TLS")]
    tls: &'static str,
}

fn row(d: &DeviceEntry) -> DeviceRow {
    DeviceRow {
        id: d.id.clone(),
        endpoint: d.endpoint.clone(),
        username: d.username.clone(),
        interval: format!("{}s", d.interval_secs),
        tls: d.tls,
    }
}

fn entry(config: &DeviceConfig) -> Result<DeviceEntry, CliError> {
    Ok(DeviceEntry {
        id: config.id.clone(),
        endpoint: config.endpoint()?.to_string(),
        username: config.username.clone(),
        interval_secs: config.poll_interval.as_secs(),
        timeout_secs: config.timeout.as_secs(),
        tls: match config.tls {
            TlsVerification::SystemDefaults => "verify",
            TlsVerification::CustomCa(_) => "custom-ca",
            TlsVerification::DangerAcceptInvalid => "insecure",
        },
    })
}

pub fn handle(devices: &[DeviceConfig], global: &GlobalOpts) -> Result<(), CliError> {
    let entries = devices.iter().map(entry).collect::<Result<Vec<_>, _>>()?;
    let out = output::render_list(global.output, &entries, row)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
