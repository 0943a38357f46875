//! DailyPlanner - AI day planning behind an optional wallet gate
//!
//! The user writes a to-do list, DailyPlanner posts it to a scheduling
//! service and shows the plan that comes back. When the wallet gate is
//! enabled, planning unlocks only after a Solana wallet has been connected.
//!
//! # Modules
//!
//! - [`planner`] - view state reducer, plan client trait and HTTP client
//! - [`wallet`] - wallet adapters, device detection and the gate
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`tui`] - interactive terminal front end

use std::sync::Arc;

use eyre::{Context, Result};
use sessionstore::{FileStore, SessionStore};

pub mod cli;
pub mod config;
pub mod planner;
pub mod tui;
pub mod wallet;

pub use config::Config;
pub use planner::{
    HttpPlanClient, PlanClient, PlanError, Planner, PlannerEvent, PlannerState, CONNECT_REQUIRED_MESSAGE,
    FETCH_FAILED_MESSAGE,
};
pub use wallet::{ConnectOutcome, WalletAdapter, WalletError, WalletGate, create_gate};

/// Open the session store named by the config
pub fn open_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let store = FileStore::open(&config.storage.session_path).context(format!(
        "Failed to open session store at {}",
        config.storage.session_path.display()
    ))?;
    Ok(Arc::new(store))
}
