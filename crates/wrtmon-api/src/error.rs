use thiserror::Error;

use crate::models::UbusStatus;

/// Top-level error type for the `wrtmon-api` crate.
///
/// Covers every failure mode of the ubus JSON-RPC surface: session
/// authentication, missing objects/methods, transport, and payload decoding.
/// `wrtmon-core` classifies these into per-feature degrade/abort decisions.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, session expired, or permission denied.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Capability ──────────────────────────────────────────────────
    /// The remote device does not expose the requested object or method.
    #[error("Unsupported ubus call {object}.{method}: {message}")]
    Unsupported {
        object: String,
        method: String,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status outside the JSON-RPC envelope.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── RPC ─────────────────────────────────────────────────────────
    /// Non-zero ubus status or JSON-RPC error not covered above.
    #[error("ubus error {code} on {object}.{method}: {message}")]
    Rpc {
        object: String,
        method: String,
        code: i64,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session was rejected and re-login might resolve it.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the device simply lacks the called object or method.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Returns `true` for network-level failures: connection, timeout, and
    /// the router reporting its own internal timeout or connection failure.
    pub fn is_communication(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Timeout { .. } => true,
            Self::Rpc { code, .. } => matches!(
                UbusStatus::from_code(*code),
                Some(UbusStatus::Timeout | UbusStatus::ConnectionFailed)
            ),
            _ => false,
        }
    }
}
