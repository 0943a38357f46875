//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DailyPlanner - AI day planning from your to-do list
#[derive(Parser)]
#[command(
    name = "dp",
    about = "Turn a to-do list into a schedule for the day",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (interactive planner when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request a plan once and print it
    Plan {
        /// Tasks, one per line (reads --file or stdin when omitted)
        tasks: Option<String>,

        /// Read tasks from a file
        #[arg(short, long, conflicts_with = "tasks")]
        file: Option<PathBuf>,
    },

    /// Connect a wallet to unlock planning
    Connect {
        /// Wallet name (first ready wallet when omitted)
        wallet: Option<String>,
    },

    /// Forget the saved wallet connection
    Disconnect,

    /// Show gate state, device class and endpoint
    Status,

    /// List supported wallets and whether they are ready
    Wallets,
}
