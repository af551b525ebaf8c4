//! `wrtmon watch`: run the polling fleet and print every publish.

use tokio::sync::mpsc;

use wrtmon_core::Fleet;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::snapshot::{SnapshotReport, render_report};

pub async fn handle(fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    let board = fleet.board();

    // One forwarder per device turns publish notifications into ids.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let mut forwarders = Vec::new();
    for id in board.ids() {
        let Some(slot) = board.slot(&id) else {
            continue;
        };
        let mut published = slot.subscribe();
        let tx = tx.clone();
        forwarders.push(tokio::spawn(async move {
            while published.changed().await.is_ok() {
                if tx.send(id.clone()).is_err() {
                    break;
                }
            }
        }));
    }
    drop(tx);

    fleet.start().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let result = loop {
        tokio::select! {
            _ = &mut shutdown => break Ok(()),
            Some(id) = rx.recv() => {
                let Some(slot) = board.slot(&id) else { continue };
                let Some(snapshot) = slot.load() else { continue };
                let report = SnapshotReport {
                    device: &id,
                    published: slot.last_published(),
                    snapshot: &snapshot,
                };
                match render_report(global.output, &report) {
                    Ok(out) => output::print_output(&out, global.quiet),
                    Err(e) => break Err(e),
                }
            }
        }
    };

    fleet.shutdown().await;
    for forwarder in forwarders {
        forwarder.abort();
    }
    result
}
