//! Concrete wallet providers
//!
//! - [`DeepLinkWallet`]: mobile-app wallets (Phantom, Solflare) reached by
//!   universal "browse" links
//! - [`CommandWallet`]: a local program that prints the wallet address
//!   (the Solana CLI by default)

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};
use url::Url;
use url::form_urlencoded::byte_serialize;

use super::adapter::{PublicKey, ReadyState, WalletAdapter};
use super::WalletError;

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

fn static_url(s: &'static str) -> Url {
    Url::parse(s).expect("valid built-in url")
}

/// Wallet that lives in a mobile app
///
/// Readiness comes from configuration since a terminal cannot inspect the
/// phone's app list. Desktop connects are not possible.
pub struct DeepLinkWallet {
    name: String,
    installed: bool,
    browse_base: String,
    install_url: Url,
}

impl DeepLinkWallet {
    pub fn new(name: &str, installed: bool, browse_base: &str, install_url: Url) -> Self {
        debug!(%name, installed, "DeepLinkWallet::new: called");
        Self {
            name: name.to_string(),
            installed,
            browse_base: browse_base.to_string(),
            install_url,
        }
    }

    pub fn phantom(installed: bool) -> Self {
        Self::new(
            "Phantom",
            installed,
            "https://phantom.app/ul/browse/",
            static_url("https://phantom.app/download"),
        )
    }

    pub fn solflare(installed: bool) -> Self {
        Self::new(
            "Solflare",
            installed,
            "https://solflare.com/ul/v1/browse/",
            static_url("https://solflare.com/download"),
        )
    }
}

#[async_trait]
impl WalletAdapter for DeepLinkWallet {
    fn name(&self) -> &str {
        &self.name
    }

    fn ready_state(&self) -> ReadyState {
        if self.installed {
            ReadyState::Installed
        } else {
            ReadyState::NotDetected
        }
    }

    async fn connect(&self) -> Result<PublicKey, WalletError> {
        debug!(name = %self.name, "DeepLinkWallet::connect: no desktop handshake");
        Err(WalletError::Unsupported {
            wallet: self.name.clone(),
        })
    }

    fn install_url(&self) -> &Url {
        &self.install_url
    }

    fn deep_link(&self, target: &Url) -> Option<Url> {
        let origin = target.origin().ascii_serialization();
        let link = format!("{}{}?ref={}", self.browse_base, encode(target.as_str()), encode(&origin));
        match Url::parse(&link) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(name = %self.name, error = %e, "deep_link: failed to build link");
                None
            }
        }
    }
}

/// Wallet reached through a local program that prints its address
pub struct CommandWallet {
    name: String,
    program: String,
    args: Vec<String>,
    install_url: Url,
}

impl CommandWallet {
    pub fn new(name: &str, command: &[String], install_url: Url) -> Self {
        debug!(%name, ?command, "CommandWallet::new: called");
        let (program, args) = match command.split_first() {
            Some((program, args)) => (program.clone(), args.to_vec()),
            None => (String::new(), Vec::new()),
        };
        Self {
            name: name.to_string(),
            program,
            args,
            install_url,
        }
    }

    /// `solana address` (or a configured replacement)
    pub fn solana_cli(command: &[String]) -> Self {
        Self::new("Solana CLI", command, static_url("https://docs.anza.xyz/cli/install"))
    }
}

#[async_trait]
impl WalletAdapter for CommandWallet {
    fn name(&self) -> &str {
        &self.name
    }

    fn ready_state(&self) -> ReadyState {
        if self.program.is_empty() {
            return ReadyState::Unsupported;
        }
        match which::which(&self.program) {
            Ok(path) => {
                debug!(?path, "CommandWallet::ready_state: program found");
                ReadyState::Installed
            }
            Err(_) => ReadyState::NotDetected,
        }
    }

    async fn connect(&self) -> Result<PublicKey, WalletError> {
        debug!(program = %self.program, args = ?self.args, "CommandWallet::connect: called");
        if self.program.is_empty() {
            return Err(WalletError::NotReady {
                wallet: self.name.clone(),
            });
        }

        let output = Command::new(&self.program).args(&self.args).output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            };
            return Err(WalletError::Rejected {
                wallet: self.name.clone(),
                reason,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        PublicKey::parse(&stdout)
    }

    fn install_url(&self) -> &Url {
        &self.install_url
    }

    fn deep_link(&self, _target: &Url) -> Option<Url> {
        None
    }
}
