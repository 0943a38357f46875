//! WalletAdapter trait and the values it exchanges

use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use url::Url;

use super::WalletError;

/// Base58 alphabet, 32..=44 chars: the shape of a Solana address
static PUBLIC_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("valid public key regex"));

/// Installation state of a wallet, as wallet adapters report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Present and usable now
    Installed,
    /// Not present yet but can be brought up on demand
    Loadable,
    /// Not found on this device
    NotDetected,
    /// Cannot work on this platform at all
    Unsupported,
}

impl ReadyState {
    pub fn is_ready(self) -> bool {
        matches!(self, ReadyState::Installed | ReadyState::Loadable)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadyState::Installed => "installed",
            ReadyState::Loadable => "loadable",
            ReadyState::NotDetected => "not detected",
            ReadyState::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// Validated base58 wallet address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(String);

impl PublicKey {
    pub fn parse(s: &str) -> Result<Self, WalletError> {
        let s = s.trim();
        if PUBLIC_KEY_RE.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(WalletError::InvalidPublicKey(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for headers, e.g. `7xKX…gAsU`
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}…{}", head, tail)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One wallet provider's connect/readiness capability
///
/// The gate only ever talks to wallets through this trait.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Display name, unique within the wallet list
    fn name(&self) -> &str;

    /// Current installation state; cheap, may inspect the environment
    fn ready_state(&self) -> ReadyState;

    fn is_ready(&self) -> bool {
        self.ready_state().is_ready()
    }

    /// Perform the provider's connect handshake
    async fn connect(&self) -> Result<PublicKey, WalletError>;

    /// Where to send users who do not have the wallet
    fn install_url(&self) -> &Url;

    /// Link that opens `target` inside the provider's mobile app, if it has one
    fn deep_link(&self, target: &Url) -> Option<Url>;
}
