//! The fixed, ordered wallet list

use std::sync::Arc;

use tracing::debug;

use super::adapter::WalletAdapter;
use super::providers::{CommandWallet, DeepLinkWallet};
use crate::config::WalletConfig;

/// Build the wallet list: Phantom, Solflare, Solana CLI, in that order
pub fn default_wallets(config: &WalletConfig) -> Vec<Arc<dyn WalletAdapter>> {
    debug!(installed_apps = ?config.installed_apps, "default_wallets: called");
    vec![
        Arc::new(DeepLinkWallet::phantom(config.is_installed("phantom"))),
        Arc::new(DeepLinkWallet::solflare(config.is_installed("solflare"))),
        Arc::new(CommandWallet::solana_cli(&config.solana_command)),
    ]
}
