//! Wallet error types

use sessionstore::StoreError;
use thiserror::Error;

/// Errors that can occur while connecting a wallet
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Unknown wallet: {0}")]
    UnknownWallet(String),

    #[error("{wallet} is not installed")]
    NotReady { wallet: String },

    #[error("{wallet} can only connect through its mobile app")]
    Unsupported { wallet: String },

    #[error("{wallet} rejected the connection: {reason}")]
    Rejected { wallet: String, reason: String },

    #[error("Invalid public key: {0:?}")]
    InvalidPublicKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session store error: {0}")]
    Store(#[from] StoreError),
}

impl WalletError {
    /// Whether trying again later could succeed without user setup
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::Rejected { .. } | WalletError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            WalletError::NotReady {
                wallet: "Phantom".to_string()
            }
            .to_string(),
            "Phantom is not installed"
        );
        assert_eq!(WalletError::UnknownWallet("Nope".to_string()).to_string(), "Unknown wallet: Nope");
    }

    #[test]
    fn test_is_retryable() {
        assert!(
            WalletError::Rejected {
                wallet: "Solana CLI".to_string(),
                reason: "exit status 1".to_string()
            }
            .is_retryable()
        );
        assert!(
            !WalletError::NotReady {
                wallet: "Phantom".to_string()
            }
            .is_retryable()
        );
        assert!(!WalletError::InvalidPublicKey("x".to_string()).is_retryable());
    }
}
