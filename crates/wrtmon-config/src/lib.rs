//! Configuration for wrtmon.
//!
//! TOML device list, credential resolution (env + keyring + plaintext),
//! and translation to `wrtmon_core::DeviceConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wrtmon_core::{DeviceConfig, TlsVerification};

/// Keyring service name; entries are `<device id>/password`.
pub const KEYRING_SERVICE: &str = "wrtmon";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no devices configured")]
    NoDevices,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Routers keyed by device id.
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Polling interval in seconds.
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            timeout: default_timeout(),
            insecure: default_insecure(),
        }
    }
}

fn default_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    10
}
fn default_insecure() -> bool {
    true
}

/// One router.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeviceProfile {
    /// Hostname or IP address.
    pub address: String,

    /// TCP port; 0 uses the scheme default.
    #[serde(default)]
    pub port: u16,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub https: bool,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password (prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override `defaults.insecure`.
    pub insecure: Option<bool>,

    /// Override `defaults.interval`.
    pub interval: Option<u64>,

    /// Override `defaults.timeout`.
    pub timeout: Option<u64>,
}

fn default_path() -> String {
    wrtmon_core::config::DEFAULT_PATH.into()
}
fn default_username() -> String {
    "root".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "wrtmon", "wrtmon").map_or_else(
        || PathBuf::from(".config/wrtmon/config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path plus `WRTMON_` environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` plus `WRTMON_` environment overrides.
///
/// A missing file is not an error; nested keys use `__`, e.g.
/// `WRTMON_DEVICES__AP1__ADDRESS`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WRTMON_").split("__"));

    Ok(figment.extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a device password: `password_env` → keyring → plaintext → empty.
///
/// rpcd accepts an empty password for accounts without one, so a missing
/// password is not an error.
pub fn resolve_password(profile: &DeviceProfile, device_id: &str) -> SecretString {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return SecretString::from(val);
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{device_id}/password")) {
        if let Ok(pw) = entry.get_password() {
            return SecretString::from(pw);
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return SecretString::from(pw.clone());
    }

    SecretString::from(String::new())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Every configured device as a `DeviceConfig`, ordered by id.
    pub fn device_configs(&self) -> Result<Vec<DeviceConfig>, ConfigError> {
        if self.devices.is_empty() {
            return Err(ConfigError::NoDevices);
        }
        self.devices
            .iter()
            .map(|(id, profile)| profile_to_device_config(id, profile, &self.defaults))
            .collect()
    }
}

/// Build a `DeviceConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_device_config(
    id: &str,
    profile: &DeviceProfile,
    defaults: &Defaults,
) -> Result<DeviceConfig, ConfigError> {
    if profile.address.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: format!("devices.{id}.address"),
            reason: "must not be empty".into(),
        });
    }

    let interval = profile.interval.unwrap_or(defaults.interval);
    if interval == 0 {
        return Err(ConfigError::Validation {
            field: format!("devices.{id}.interval"),
            reason: "must be at least 1 second".into(),
        });
    }

    let tls = if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = DeviceConfig::new(id, profile.address.trim());
    config.port = profile.port;
    config.path.clone_from(&profile.path);
    config.https = profile.https;
    config.username.clone_from(&profile.username);
    config.password = resolve_password(profile, id);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.poll_interval = Duration::from_secs(interval);

    config.endpoint().map_err(|e| ConfigError::Validation {
        field: format!("devices.{id}"),
        reason: e.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = load_config_from(&dir.path().join("absent.toml")).expect("defaults");

        assert!(config.devices.is_empty());
        assert_eq!(config.defaults.interval, 30);
        assert_eq!(config.defaults.timeout, 10);
        assert!(config.defaults.insecure);
        assert!(matches!(config.device_configs(), Err(ConfigError::NoDevices)));
    }

    #[test]
    fn devices_inherit_defaults() {
        let file = write_config(
            r#"
            [defaults]
            interval = 60

            [devices.gw]
            address = "192.168.1.1"
            https = true
            port = 8443
            insecure = false
            timeout = 5

            [devices.ap1]
            address = "ap1.lan"
            username = "monitor"
            password = "hunter2"
            "#,
        );

        let config = load_config_from(file.path()).expect("config loads");
        let devices = config.device_configs().expect("valid devices");

        let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["ap1", "gw"]);

        let ap1 = &devices[0];
        assert_eq!(ap1.endpoint().expect("url").as_str(), "http://ap1.lan/ubus");
        assert_eq!(ap1.username, "monitor");
        assert_eq!(ap1.poll_interval, Duration::from_secs(60));
        assert_eq!(ap1.timeout, Duration::from_secs(10));
        assert_eq!(ap1.tls, TlsVerification::DangerAcceptInvalid);

        let gw = &devices[1];
        assert_eq!(
            gw.endpoint().expect("url").as_str(),
            "https://192.168.1.1:8443/ubus"
        );
        assert_eq!(gw.username, "root");
        assert_eq!(gw.timeout, Duration::from_secs(5));
        assert_eq!(gw.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn ca_cert_takes_precedence_over_insecure() {
        let profile = DeviceProfile {
            address: "gw.lan".into(),
            port: 0,
            path: default_path(),
            https: true,
            username: default_username(),
            password: None,
            password_env: None,
            ca_cert: Some(PathBuf::from("/etc/ssl/router.pem")),
            insecure: Some(true),
            interval: None,
            timeout: None,
        };

        let config =
            profile_to_device_config("gw", &profile, &Defaults::default()).expect("valid");

        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/router.pem"))
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config(
            r#"
            [devices.gw]
            address = "192.168.1.1"
            interval = 0
            "#,
        );

        let config = load_config_from(file.path()).expect("config loads");
        let err = config.device_configs().expect_err("invalid interval");

        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "devices.gw.interval"
        ));
    }

    #[test]
    fn unparseable_address_is_rejected() {
        let file = write_config(
            r#"
            [devices.bad]
            address = "not a host"
            "#,
        );

        let config = load_config_from(file.path()).expect("config loads");
        assert!(matches!(
            config.device_configs(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        // PATH is always set in a test environment.
        let expected = std::env::var("PATH").expect("PATH set");
        let profile = DeviceProfile {
            address: "ap.lan".into(),
            port: 0,
            path: default_path(),
            https: false,
            username: default_username(),
            password: Some("plaintext".into()),
            password_env: Some("PATH".into()),
            ca_cert: None,
            insecure: None,
            interval: None,
            timeout: None,
        };

        assert_eq!(resolve_password(&profile, "ap").expose_secret(), expected);
    }
}
