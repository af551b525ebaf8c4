//! Snapshot orchestration between `wrtmon-api` and its consumers.
//!
//! - **[`DeviceMonitor`]** runs one update cycle per router: load the
//!   capability catalog (once), fetch board identity, discover wireless
//!   interfaces, probe AP clients, mesh links and multi-WAN health, then
//!   publish a complete [`DeviceSnapshot`] with a single atomic swap.
//!   Optional features the router lacks degrade to empty sections.
//!
//! - **[`SnapshotBoard`]** holds every device's last published snapshot in
//!   registration order and exposes it read-only through
//!   [`SnapshotRegistry`]. [`MeshPeerResolver`] joins mesh identifiers
//!   across devices through that view without blocking on in-flight cycles.
//!
//! - **[`Fleet`]** builds monitors from [`DeviceConfig`]s and drives one
//!   independent polling task per device.
//!
//! Failures reach the host as [`CoreError::AuthenticationFailed`] or
//! [`CoreError::UpdateFailed`]; the previous snapshot stays visible.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fleet;
pub mod model;
pub mod monitor;
pub mod probes;
pub mod resolver;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::CapabilityCatalog;
pub use config::{DeviceConfig, TlsVerification};
pub use error::CoreError;
pub use fleet::Fleet;
pub use monitor::{CycleState, DeviceMonitor};
pub use resolver::MeshPeerResolver;
pub use store::{SnapshotBoard, SnapshotRegistry, SnapshotSlot};

pub use model::{
    ApInterface, ClientSnapshot, DeviceInfo, DeviceSnapshot, MacAddress, MeshInterface,
    MeshLinkSnapshot, MeshPeer, WanSnapshot, WirelessTopology,
};
