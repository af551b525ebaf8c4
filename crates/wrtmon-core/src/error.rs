// ── Core error types ──
//
// Host-facing errors from wrtmon-core. A failed polling cycle surfaces as
// exactly one of `AuthenticationFailed` or `UpdateFailed`; the remaining
// variants cover setup and lookup failures outside a cycle.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Cycle outcomes ───────────────────────────────────────────────
    /// The router rejected our credentials even after one re-login.
    /// The host should prompt for new credentials or stop polling.
    #[error("Authentication failed for device {device}: {message}")]
    AuthenticationFailed { device: String, message: String },

    /// Any other failure that aborted a cycle. The previously published
    /// snapshot stays visible.
    #[error("Update failed for device {device}: {message}")]
    UpdateFailed { device: String, message: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Device not found: {id}")]
    DeviceNotFound { id: String },

    #[error("Device id registered twice: {id}")]
    DuplicateDevice { id: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Classify a transport-layer error raised while updating `device`.
    pub(crate) fn from_api(device: &str, err: &wrtmon_api::Error) -> Self {
        if err.is_auth_failure() {
            Self::AuthenticationFailed {
                device: device.to_owned(),
                message: err.to_string(),
            }
        } else {
            Self::UpdateFailed {
                device: device.to_owned(),
                message: format!("OpenWrt communication error: {err}"),
            }
        }
    }

    /// Returns `true` if re-entering credentials might resolve this error.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

impl From<wrtmon_api::Error> for CoreError {
    fn from(err: wrtmon_api::Error) -> Self {
        match err {
            wrtmon_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            wrtmon_api::Error::Tls(msg) => Self::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            other => Self::from_api("<unknown>", &other),
        }
    }
}
