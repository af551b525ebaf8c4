//! Async client for the OpenWrt ubus JSON-RPC endpoint served by rpcd.
//!
//! - **[`UbusClient`]** owns one router's session token. The first call logs
//!   in; a call rejected for authentication re-logs in once and retries once.
//! - **[`Error`]** classifies failures as authentication, unsupported
//!   object/method, or communication so callers can decide per feature
//!   whether to degrade or abort.
//! - **[`TransportConfig`]** carries TLS mode and the per-request timeout.

pub mod client;
pub mod error;
pub mod models;
mod session;
pub mod transport;

pub use client::UbusClient;
pub use error::Error;
pub use models::UbusStatus;
pub use transport::{TlsMode, TransportConfig};
