use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use sessionstore::cli::{Cli, Command};
use sessionstore::config::Config;
use sessionstore::{FileStore, SessionStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("sessionstore starting");

    let store = FileStore::open(&store_path).context("Failed to open session store")?;

    match cli.command {
        Command::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{} Key not set: {}", "✗".red(), key);
                std::process::exit(1);
            }
        },
        Command::Set { key, value } => {
            store.set(&key, &value)?;
            println!("{} {} = {}", "✓".green(), key.cyan(), value);
        }
        Command::Remove { key } => {
            store.remove(&key)?;
            println!("{} Removed: {}", "✓".green(), key);
        }
        Command::List => {
            let entries = store.entries()?;
            if entries.is_empty() {
                println!("No keys stored");
            } else {
                for (key, value) in entries {
                    println!("{} = {}", key.cyan(), value);
                }
            }
        }
        Command::Path => {
            println!("{}", store.path().display());
        }
    }

    Ok(())
}
