//! Wallet gate: decides whether the planner form is reachable
//!
//! Policy:
//! - availability is pre-checked; desktop connects require a ready wallet
//! - on mobile, connect hands off to the wallet app (or its install page)
//!   instead of calling the adapter, unless the wallet has no app link
//! - a persisted flag opens the gate at startup without re-verifying the
//!   wallet session; `disconnect` is the way to clear a stale flag
//! - connecting is always explicit

use std::sync::Arc;

use sessionstore::SessionStore;
use tracing::{debug, info, warn};
use url::Url;

use super::adapter::{PublicKey, WalletAdapter};
use super::device::DeviceClass;
use super::WalletError;

/// Session key of the persisted connected flag
pub const CONNECTED_KEY: &str = "walletConnected";

/// Shown for any failed connect attempt
pub const CONNECTION_FAILED_MESSAGE: &str = "Failed to connect wallet. Please try again.";

/// Why the user is being sent off-app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// Open the wallet's mobile app
    HandOff,
    /// Wallet missing; go to its install page
    Install,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub wallet: String,
    pub kind: RedirectKind,
    pub url: Url,
}

/// Successful result of a connect attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Handshake completed; the gate is open
    Connected(PublicKey),
    /// User must leave the app; the gate stays as it was
    Redirect(Redirect),
}

pub struct WalletGate {
    store: Arc<dyn SessionStore>,
    wallets: Vec<Arc<dyn WalletAdapter>>,
    device: DeviceClass,
    dapp_url: Url,
    available: bool,
    connected: bool,
    public_key: Option<PublicKey>,
    error: Option<String>,
}

impl WalletGate {
    pub fn new(
        store: Arc<dyn SessionStore>,
        wallets: Vec<Arc<dyn WalletAdapter>>,
        device: DeviceClass,
        dapp_url: Url,
    ) -> Self {
        debug!(wallet_count = wallets.len(), %device, %dapp_url, "WalletGate::new: called");
        Self {
            store,
            wallets,
            device,
            dapp_url,
            available: false,
            connected: false,
            public_key: None,
            error: None,
        }
    }

    /// Open the gate if the persisted flag says so; never calls `connect`
    ///
    /// An unreadable session counts as no flag; the gate stays closed.
    pub fn restore(&mut self) -> bool {
        let flag = match self.store.get(CONNECTED_KEY) {
            Ok(flag) => flag,
            Err(e) => {
                warn!(error = %e, "Unreadable session, treating wallet as disconnected");
                None
            }
        };
        debug!(?flag, "WalletGate::restore: read flag");
        if flag.as_deref() == Some("true") {
            info!("Wallet connection restored from session");
            self.connected = true;
        }
        self.connected
    }

    /// Set `available` if any wallet reports ready
    pub fn detect_availability(&mut self) -> bool {
        self.available = self.wallets.iter().any(|w| w.is_ready());
        debug!(available = self.available, "WalletGate::detect_availability");
        self.available
    }

    pub fn is_open(&self) -> bool {
        self.connected
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn wallets(&self) -> &[Arc<dyn WalletAdapter>] {
        &self.wallets
    }

    /// Key from a connect in this session; None after a restore
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    /// Last connect failure, as shown to the user
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Position of a wallet by case-insensitive name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.wallets.iter().position(|w| w.name().eq_ignore_ascii_case(name))
    }

    /// First wallet that reports ready
    pub fn first_ready(&self) -> Option<usize> {
        self.wallets.iter().position(|w| w.is_ready())
    }

    pub async fn connect_by_name(&mut self, name: &str) -> Result<ConnectOutcome, WalletError> {
        match self.index_of(name) {
            Some(index) => self.connect(index).await,
            None => Err(self.fail(WalletError::UnknownWallet(name.to_string()))),
        }
    }

    /// Connect the wallet at `index`
    ///
    /// Failures leave the gate closed and record the generic message.
    pub async fn connect(&mut self, index: usize) -> Result<ConnectOutcome, WalletError> {
        let Some(wallet) = self.wallets.get(index).cloned() else {
            return Err(self.fail(WalletError::UnknownWallet(format!("#{}", index))));
        };
        let ready = wallet.is_ready();
        debug!(wallet = %wallet.name(), ready, device = %self.device, "WalletGate::connect: called");

        if self.device.is_mobile() {
            if !ready {
                return Ok(self.redirect(wallet.as_ref(), RedirectKind::Install, wallet.install_url().clone()));
            }
            if let Some(link) = wallet.deep_link(&self.dapp_url) {
                return Ok(self.redirect(wallet.as_ref(), RedirectKind::HandOff, link));
            }
            debug!(wallet = %wallet.name(), "WalletGate::connect: no app link, connecting directly");
        } else if !ready {
            return Err(self.fail(WalletError::NotReady {
                wallet: wallet.name().to_string(),
            }));
        }

        let key = match wallet.connect().await {
            Ok(key) => key,
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self.store.set(CONNECTED_KEY, "true") {
            return Err(self.fail(e.into()));
        }

        info!(wallet = %wallet.name(), public_key = %key, "Wallet connected");
        self.connected = true;
        self.public_key = Some(key.clone());
        self.error = None;
        Ok(ConnectOutcome::Connected(key))
    }

    /// Forget the persisted flag and close the gate
    pub fn disconnect(&mut self) -> Result<(), WalletError> {
        self.store.remove(CONNECTED_KEY)?;
        info!("Wallet disconnected");
        self.connected = false;
        self.public_key = None;
        self.error = None;
        Ok(())
    }

    fn redirect(&mut self, wallet: &dyn WalletAdapter, kind: RedirectKind, url: Url) -> ConnectOutcome {
        info!(wallet = %wallet.name(), ?kind, %url, "Redirecting to wallet");
        self.error = None;
        ConnectOutcome::Redirect(Redirect {
            wallet: wallet.name().to_string(),
            kind,
            url,
        })
    }

    fn fail(&mut self, error: WalletError) -> WalletError {
        warn!(error = %error, retryable = error.is_retryable(), "Wallet connection failed");
        self.error = Some(CONNECTION_FAILED_MESSAGE.to_string());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::adapter::ReadyState;
    use crate::wallet::adapter::mock::MockWallet;
    use sessionstore::{MemoryStore, StoreError, StoreResult};

    /// Store whose every operation fails, like an unreadable session file
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Poisoned)
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Poisoned)
        }
    }

    fn dapp() -> Url {
        Url::parse("https://planner.example.com").unwrap()
    }

    fn gate_with(
        store: Arc<dyn SessionStore>,
        wallets: Vec<Arc<MockWallet>>,
        device: DeviceClass,
    ) -> WalletGate {
        let wallets: Vec<Arc<dyn WalletAdapter>> = wallets.into_iter().map(|w| w as Arc<dyn WalletAdapter>).collect();
        WalletGate::new(store, wallets, device, dapp())
    }

    #[test]
    fn test_no_flag_no_ready_wallet_keeps_gate_closed() {
        let store = Arc::new(MemoryStore::new());
        let wallets = vec![
            Arc::new(MockWallet::new("Phantom", ReadyState::NotDetected)),
            Arc::new(MockWallet::new("Solflare", ReadyState::Unsupported)),
        ];
        let mut gate = gate_with(store, wallets, DeviceClass::Desktop);

        assert!(!gate.restore());
        assert!(!gate.detect_availability());
        assert!(!gate.is_open());
        assert_eq!(gate.first_ready(), None);
    }

    #[test]
    fn test_availability_with_one_ready_wallet() {
        let store = Arc::new(MemoryStore::new());
        let wallets = vec![
            Arc::new(MockWallet::new("Phantom", ReadyState::NotDetected)),
            Arc::new(MockWallet::new("Solana CLI", ReadyState::Loadable)),
        ];
        let mut gate = gate_with(store, wallets, DeviceClass::Desktop);

        assert!(gate.detect_availability());
        assert_eq!(gate.first_ready(), Some(1));
    }

    #[test]
    fn test_restore_opens_without_connect() {
        let store = Arc::new(MemoryStore::with_values([(CONNECTED_KEY, "true")]));
        let wallet = Arc::new(MockWallet::new("Phantom", ReadyState::NotDetected));
        let mut gate = gate_with(store, vec![wallet.clone()], DeviceClass::Desktop);

        assert!(gate.restore());
        assert!(gate.is_open());
        assert_eq!(wallet.connect_count(), 0);
        assert_eq!(gate.public_key(), None);
    }

    #[test]
    fn test_restore_ignores_other_values() {
        let store = Arc::new(MemoryStore::with_values([(CONNECTED_KEY, "false")]));
        let mut gate = gate_with(store, vec![], DeviceClass::Desktop);
        assert!(!gate.restore());
    }

    #[tokio::test]
    async fn test_desktop_connect_persists_flag() {
        let store = Arc::new(MemoryStore::new());
        let wallet = Arc::new(MockWallet::new("Solana CLI", ReadyState::Installed));
        let mut gate = gate_with(store.clone(), vec![wallet.clone()], DeviceClass::Desktop);

        let outcome = gate.connect(0).await.unwrap();

        assert!(matches!(outcome, ConnectOutcome::Connected(_)));
        assert!(gate.is_open());
        assert_eq!(gate.error(), None);
        assert_eq!(wallet.connect_count(), 1);
        assert_eq!(store.get(CONNECTED_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn test_restore_with_unreadable_store_stays_closed() {
        let wallet = Arc::new(MockWallet::new("Phantom", ReadyState::Installed));
        let mut gate = gate_with(Arc::new(BrokenStore), vec![wallet.clone()], DeviceClass::Desktop);

        assert!(!gate.restore());
        assert!(!gate.is_open());
        assert_eq!(gate.error(), None);
        assert_eq!(wallet.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_connect_fails_when_flag_cannot_be_saved() {
        let wallet = Arc::new(MockWallet::new("Solana CLI", ReadyState::Installed));
        let mut gate = gate_with(Arc::new(BrokenStore), vec![wallet.clone()], DeviceClass::Desktop);

        let result = gate.connect(0).await;

        assert!(matches!(result, Err(WalletError::Store(_))));
        assert!(!gate.is_open());
        assert_eq!(gate.public_key(), None);
        assert_eq!(gate.error(), Some(CONNECTION_FAILED_MESSAGE));
        assert_eq!(wallet.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_desktop_not_ready_fails_without_connect() {
        let store = Arc::new(MemoryStore::new());
        let wallet = Arc::new(MockWallet::new("Phantom", ReadyState::NotDetected));
        let mut gate = gate_with(store.clone(), vec![wallet.clone()], DeviceClass::Desktop);

        let result = gate.connect(0).await;

        assert!(matches!(result, Err(WalletError::NotReady { .. })));
        assert!(!gate.is_open());
        assert_eq!(gate.error(), Some(CONNECTION_FAILED_MESSAGE));
        assert_eq!(wallet.connect_count(), 0);
        assert_eq!(store.get(CONNECTED_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_handshake_leaves_gate_closed() {
        let store = Arc::new(MemoryStore::new());
        let wallet = Arc::new(MockWallet::new("Solana CLI", ReadyState::Installed).rejecting("user declined"));
        let mut gate = gate_with(store.clone(), vec![wallet], DeviceClass::Desktop);

        let result = gate.connect(0).await;

        assert!(matches!(result, Err(WalletError::Rejected { .. })));
        assert!(!gate.is_open());
        assert_eq!(gate.error(), Some(CONNECTION_FAILED_MESSAGE));
        assert_eq!(store.get(CONNECTED_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_mobile_not_ready_redirects_to_install() {
        let store = Arc::new(MemoryStore::new());
        let wallet = Arc::new(MockWallet::new("Phantom", ReadyState::NotDetected));
        let mut gate = gate_with(store.clone(), vec![wallet.clone()], DeviceClass::Mobile);

        let outcome = gate.connect(0).await.unwrap();

        match outcome {
            ConnectOutcome::Redirect(r) => {
                assert_eq!(r.kind, RedirectKind::Install);
                assert_eq!(r.url.as_str(), "https://phantom.example/download");
                assert_eq!(r.wallet, "Phantom");
            }
            other => panic!("expected install redirect, got {:?}", other),
        }
        assert!(!gate.is_open());
        assert_eq!(wallet.connect_count(), 0);
        assert_eq!(store.get(CONNECTED_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_mobile_ready_hands_off_to_app() {
        let store = Arc::new(MemoryStore::new());
        let wallet = Arc::new(MockWallet::new("Phantom", ReadyState::Installed));
        let mut gate = gate_with(store, vec![wallet.clone()], DeviceClass::Mobile);

        let outcome = gate.connect(0).await.unwrap();

        assert!(matches!(
            outcome,
            ConnectOutcome::Redirect(Redirect {
                kind: RedirectKind::HandOff,
                ..
            })
        ));
        assert!(!gate.is_open());
        assert_eq!(wallet.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_connect_unknown_index_and_name() {
        let store = Arc::new(MemoryStore::new());
        let mut gate = gate_with(store, vec![Arc::new(MockWallet::new("Phantom", ReadyState::Installed))], DeviceClass::Desktop);

        assert!(matches!(gate.connect(7).await, Err(WalletError::UnknownWallet(_))));
        assert!(matches!(
            gate.connect_by_name("Backpack").await,
            Err(WalletError::UnknownWallet(_))
        ));
        assert_eq!(gate.index_of("phantom"), Some(0));
    }

    #[tokio::test]
    async fn test_disconnect_clears_flag() {
        let store = Arc::new(MemoryStore::with_values([(CONNECTED_KEY, "true")]));
        let mut gate = gate_with(store.clone(), vec![], DeviceClass::Desktop);
        gate.restore();
        assert!(gate.is_open());

        gate.disconnect().unwrap();

        assert!(!gate.is_open());
        assert_eq!(store.get(CONNECTED_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let store = Arc::new(MemoryStore::new());
        let wallets = vec![
            Arc::new(MockWallet::new("Phantom", ReadyState::NotDetected)),
            Arc::new(MockWallet::new("Solana CLI", ReadyState::Installed)),
        ];
        let mut gate = gate_with(store, wallets, DeviceClass::Desktop);

        assert!(gate.connect(0).await.is_err());
        assert!(gate.error().is_some());

        gate.connect_by_name("solana cli").await.unwrap();
        assert_eq!(gate.error(), None);
        assert!(gate.public_key().is_some());
    }
}
