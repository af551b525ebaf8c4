//! Command handlers, one module per subcommand family.

mod actions;
mod devices;
mod snapshot;
mod util;
mod watch;

use wrtmon_core::{DeviceConfig, Fleet};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    cmd: Command,
    devices: &[DeviceConfig],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        // Listing the configuration needs no router traffic
        Command::Devices => devices::handle(devices, global),
        Command::Snapshot(args) => snapshot::handle(&Fleet::new(devices)?, args, global).await,
        Command::Watch => watch::handle(&Fleet::new(devices)?, global).await,
        Command::Wps(args) => actions::wps(&Fleet::new(devices)?, args, global).await,
        Command::Reboot(args) => actions::reboot(&Fleet::new(devices)?, args, global).await,
    }
}
