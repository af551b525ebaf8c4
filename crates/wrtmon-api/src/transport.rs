// HTTP settings for talking to rpcd through uhttpd.
//
// Most routers serve `/ubus` over plain HTTP on the LAN, or over HTTPS with
// the self-signed certificate uhttpd generates on first boot.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// How the router's certificate is checked when the endpoint is HTTPS.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate, e.g. uhttpd's generated one.
    DangerAcceptInvalid,
}

/// Per-router HTTP settings.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// Upper bound for every individual RPC round trip.
    pub timeout: Duration,
}

/// Self-signed certificates accepted, 10 s per round trip.
impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build the `reqwest::Client` a [`UbusClient`](crate::UbusClient) posts
    /// through. No cookie store: rpcd carries the session inside each
    /// JSON-RPC body, not in HTTP headers.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("wrtmon/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read {}: {e}", path.display())))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
