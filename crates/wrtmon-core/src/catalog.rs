// ── Capability catalog ──
//
// The set of ubus objects a router exposes, fetched once via `list *` and
// never invalidated for the lifetime of the owning monitor.

use std::collections::BTreeSet;

use tokio::sync::OnceCell;
use tracing::debug;

use wrtmon_api::{Error, UbusClient};

/// Lazily loaded set of supported ubus namespaces for one device.
#[derive(Debug, Default)]
pub struct CapabilityCatalog {
    namespaces: OnceCell<BTreeSet<String>>,
}

impl CapabilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog unless it is already loaded.
    ///
    /// Failures propagate and leave the catalog unloaded, so the next cycle
    /// tries again.
    pub async fn ensure_loaded(&self, client: &UbusClient) -> Result<(), Error> {
        self.namespaces
            .get_or_try_init(|| async {
                let listing = client.list("*").await?;
                let namespaces: BTreeSet<String> = listing.into_iter().map(|(k, _)| k).collect();
                debug!(count = namespaces.len(), "loaded ubus catalog");
                Ok::<_, Error>(namespaces)
            })
            .await?;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.namespaces.initialized()
    }

    /// Whether `namespace` is exposed. `false` until the catalog is loaded.
    pub fn supports(&self, namespace: &str) -> bool {
        self.namespaces
            .get()
            .is_some_and(|set| set.contains(namespace))
    }

    /// All known namespaces, empty until loaded.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces
            .get()
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    #[cfg(test)]
    pub(crate) fn preloaded<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: OnceCell::new_with(Some(namespaces.into_iter().map(Into::into).collect())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_catalog_supports_nothing() {
        let catalog = CapabilityCatalog::new();
        assert!(!catalog.is_loaded());
        assert!(!catalog.supports("system"));
        assert_eq!(catalog.namespaces().count(), 0);
    }

    #[test]
    fn membership_is_exact() {
        let catalog = CapabilityCatalog::preloaded(["system", "hostapd.wlan0"]);
        assert!(catalog.supports("hostapd.wlan0"));
        assert!(!catalog.supports("hostapd"));
        assert!(!catalog.supports("mwan3"));
    }
}
