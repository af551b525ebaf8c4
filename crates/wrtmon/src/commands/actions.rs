//! `wrtmon wps` and `wrtmon reboot`.

use wrtmon_core::Fleet;

use crate::cli::{GlobalOpts, RebootArgs, Toggle, WpsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn wps(fleet: &Fleet, args: WpsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let monitor = fleet.device(&args.device)?;
    let enable = matches!(args.state, Toggle::On);

    let result = monitor.set_pairing(&args.iface, enable).await;
    fleet.shutdown().await;
    let snapshot = result?;

    let Some(ap) = snapshot.wireless.get(&args.iface) else {
        return Err(CliError::NotFound {
            resource_type: "interface".into(),
            identifier: args.iface,
            list_command: format!("snapshot {}", args.device),
        });
    };

    let out = output::render_single(global.output, ap, |ap| {
        format!(
            "WPS pairing on {}/{}: {}",
            args.device,
            args.iface,
            if ap.pairing_active { "active" } else { "inactive" }
        )
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn reboot(fleet: &Fleet, args: RebootArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let monitor = fleet.device(&args.device)?;

    if !util::confirm(&format!("Reboot {}?", args.device), global.yes)? {
        return Ok(());
    }

    // The session dies with the router; no logout afterwards.
    monitor.reboot().await?;

    if !global.quiet {
        eprintln!("Reboot requested for {}", args.device);
    }
    Ok(())
}
