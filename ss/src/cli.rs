//! CLI argument parsing for sessionstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ss")]
#[command(author, version, about = "Inspect and edit persisted session state", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Session file to operate on (overrides config)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value stored under a key
    Get {
        /// Key to read
        #[arg(required = true)]
        key: String,
    },

    /// Store a value under a key
    Set {
        /// Key to write
        #[arg(required = true)]
        key: String,

        /// Value to store
        #[arg(required = true)]
        value: String,
    },

    /// Remove a key
    Remove {
        /// Key to remove
        #[arg(required = true)]
        key: String,
    },

    /// List all stored keys and values
    List,

    /// Print the path of the session file
    Path,
}
