// ── Runtime connection configuration ──
//
// These types describe *how* to reach one router. They carry credential
// data and connection tuning, but never touch disk. The binary builds a
// `DeviceConfig` per configured device and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
/// Default bound on a single RPC round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// rpcd's conventional mount point under uhttpd.
pub const DEFAULT_PATH: &str = "/ubus";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs). Default for local routers.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for polling a single router.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Stable identifier, unique within a fleet.
    pub id: String,
    /// Hostname or IP address.
    pub address: String,
    /// TCP port; `0` leaves it to the scheme default.
    pub port: u16,
    /// rpcd path, normally `/ubus`.
    pub path: String,
    pub https: bool,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-RPC timeout.
    pub timeout: Duration,
    /// How often the fleet runs a cycle for this device.
    pub poll_interval: Duration,
}

impl DeviceConfig {
    /// Config with defaults for everything but identity and address.
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            port: 0,
            path: DEFAULT_PATH.into(),
            https: false,
            username: "root".into(),
            password: SecretString::from(String::new()),
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Assemble `<scheme>://<address>[:<port>]<path>`.
    pub fn endpoint(&self) -> Result<Url, CoreError> {
        let scheme = if self.https { "https" } else { "http" };
        let port = if self.port > 0 {
            format!(":{}", self.port)
        } else {
            String::new()
        };
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        let raw = format!("{scheme}://{}{port}{path}", self.address);
        Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("device {}: invalid endpoint {raw}: {e}", self.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_omits_zero_port() {
        let cfg = DeviceConfig::new("ap1", "192.168.1.2");
        let url = cfg.endpoint().expect("valid endpoint");
        assert_eq!(url.as_str(), "http://192.168.1.2/ubus");
    }

    #[test]
    fn endpoint_includes_explicit_port_and_scheme() {
        let mut cfg = DeviceConfig::new("gw", "router.lan");
        cfg.https = true;
        cfg.port = 8443;
        cfg.path = "cgi-bin/luci/rpc".into();
        let url = cfg.endpoint().expect("valid endpoint");
        assert_eq!(url.as_str(), "https://router.lan:8443/cgi-bin/luci/rpc");
    }

    #[test]
    fn endpoint_rejects_garbage_address() {
        let cfg = DeviceConfig::new("bad", "not a host");
        assert!(matches!(cfg.endpoint(), Err(CoreError::Config { .. })));
    }
}
