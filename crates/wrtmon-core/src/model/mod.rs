// ── Domain model ──

pub mod mac;
pub mod snapshot;
pub mod topology;

pub use mac::MacAddress;
pub use snapshot::{
    ClientSnapshot, DeviceInfo, DeviceSnapshot, MeshLinkSnapshot, MeshPeer, WanSnapshot,
};
pub use topology::{ApInterface, MeshInterface, WirelessTopology};
