//! SessionStore - persisted key/value session state
//!
//! Holds the handful of string values an application wants to survive a
//! restart (for example a "wallet connected" flag). Consumers depend on the
//! [`SessionStore`] trait and receive a concrete store by injection, so tests
//! can swap in [`MemoryStore`] while the real binary uses [`FileStore`].
//!
//! # Layout
//!
//! ```text
//! ~/.local/share/dailyplanner/
//! ├── session.json         # {"walletConnected": "true"}
//! └── session.json.lock    # advisory lock held during writes
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sessionstore::{FileStore, SessionStore};
//!
//! let store = FileStore::open("session.json")?;
//! store.set("walletConnected", "true")?;
//! assert_eq!(store.get("walletConnected")?.as_deref(), Some("true"));
//! ```

pub mod cli;
pub mod config;
mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::{FileStore, MemoryStore, SessionStore};

/// File name used when only a directory is configured
pub const DEFAULT_FILE_NAME: &str = "session.json";
