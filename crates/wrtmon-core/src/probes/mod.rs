// ── Feature probes ──
//
// Independent fetchers, one per router feature. Each gated probe names the
// ubus namespace it needs; the monitor checks the capability catalog and
// skips the probe entirely when the namespace is absent.

pub mod actions;
pub mod board;
pub mod clients;
pub mod mesh;
pub mod wan;
pub mod wireless;

use tracing::{info, warn};

use wrtmon_api::Error;

/// Collapse an optional feature's failure into its empty default.
///
/// Unsupported objects and communication failures degrade; authentication
/// and every other error propagate and abort the cycle.
pub(crate) fn degrade<T: Default>(
    device: &str,
    feature: &str,
    result: Result<T, Error>,
) -> Result<T, Error> {
    match result {
        Err(e) if e.is_unsupported() => {
            info!(device, feature, error = %e, "feature not supported, skipping");
            Ok(T::default())
        }
        Err(e) if e.is_communication() => {
            warn!(device, feature, error = %e, "feature unreachable this cycle, skipping");
            Ok(T::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_degrades_to_default() {
        let result: Result<Vec<u8>, Error> = Err(Error::Unsupported {
            object: "mwan3".into(),
            method: "status".into(),
            message: "not found".into(),
        });
        assert_eq!(degrade("gw", "mwan3", result).expect("degraded"), Vec::<u8>::new());
    }

    #[test]
    fn auth_failure_propagates() {
        let result: Result<Vec<u8>, Error> = Err(Error::Authentication {
            message: "Access denied".into(),
        });
        assert!(degrade("gw", "mwan3", result).is_err());
    }

    #[test]
    fn malformed_payload_propagates() {
        let result: Result<Vec<u8>, Error> = Err(Error::Deserialization {
            message: "missing field".into(),
            body: "{}".into(),
        });
        assert!(degrade("gw", "mwan3", result).is_err());
    }
}
