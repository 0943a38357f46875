//! Wallet module for DailyPlanner
//!
//! Adapter trait, concrete providers, device detection, and the gate that
//! keeps the planner closed until a wallet is connected.

use std::sync::Arc;

use sessionstore::SessionStore;
use tracing::debug;
use url::Url;

pub mod adapter;
mod device;
mod error;
mod gate;
mod providers;
mod registry;

pub use adapter::{PublicKey, ReadyState, WalletAdapter};
pub use device::{DeviceClass, default_user_agent, resolve_user_agent};
pub use error::WalletError;
pub use gate::{CONNECTED_KEY, CONNECTION_FAILED_MESSAGE, ConnectOutcome, Redirect, RedirectKind, WalletGate};
pub use providers::{CommandWallet, DeepLinkWallet};
pub use registry::default_wallets;

use crate::config::WalletConfig;

/// Build the gate from config, restore the persisted flag, and detect wallets
///
/// Returns None when the gate is disabled.
pub fn create_gate(config: &WalletConfig, store: Arc<dyn SessionStore>) -> eyre::Result<Option<WalletGate>> {
    if !config.enabled {
        debug!("create_gate: wallet gate disabled");
        return Ok(None);
    }

    let user_agent = resolve_user_agent(config);
    let device = DeviceClass::detect(&user_agent);
    let dapp_url = Url::parse(&config.dapp_url).map_err(|e| eyre::eyre!("Invalid dapp-url {:?}: {}", config.dapp_url, e))?;

    let mut gate = WalletGate::new(store, default_wallets(config), device, dapp_url);
    gate.restore();
    gate.detect_availability();
    debug!(open = gate.is_open(), available = gate.is_available(), "create_gate: ready");
    Ok(Some(gate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionstore::{FileStore, MemoryStore};

    #[test]
    fn test_disabled_gate_is_none() {
        let config = WalletConfig {
            enabled: false,
            ..Default::default()
        };
        let gate = create_gate(&config, Arc::new(MemoryStore::new())).unwrap();
        assert!(gate.is_none());
    }

    #[test]
    fn test_create_gate_restores_flag() {
        let config = WalletConfig {
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
            ..Default::default()
        };
        let store = Arc::new(MemoryStore::with_values([(CONNECTED_KEY, "true")]));
        let gate = create_gate(&config, store).unwrap().unwrap();
        assert!(gate.is_open());
        assert_eq!(gate.device(), DeviceClass::Desktop);
        assert_eq!(gate.wallets().len(), 3);
    }

    #[test]
    fn test_create_gate_with_corrupt_session_starts_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let config = WalletConfig {
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
            ..Default::default()
        };

        let store = Arc::new(FileStore::open(&path).unwrap());
        let gate = create_gate(&config, store).unwrap().unwrap();
        assert!(!gate.is_open());
        assert_eq!(gate.error(), None);
    }

    #[test]
    fn test_create_gate_rejects_bad_dapp_url() {
        let config = WalletConfig {
            dapp_url: "::nope::".to_string(),
            ..Default::default()
        };
        assert!(create_gate(&config, Arc::new(MemoryStore::new())).is_err());
    }
}
