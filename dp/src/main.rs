//! DailyPlanner - AI day planning behind an optional wallet gate
//!
//! CLI entry point: interactive TUI by default, batch subcommands otherwise.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use sessionstore::SessionStore;
use tracing::{debug, info, warn};

use dailyplanner::cli::{Cli, Command};
use dailyplanner::config::Config;
use dailyplanner::wallet::{ConnectOutcome, RedirectKind, WalletGate, default_wallets};
use dailyplanner::{HttpPlanClient, Planner, create_gate, open_store, tui};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dailyplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("dailyplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        endpoint = %config.planner.endpoint(),
        gate = config.wallet.enabled,
        "DailyPlanner loaded config"
    );

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => cmd_tui(&config).await,
        Some(Command::Plan { tasks, file }) => cmd_plan(&config, tasks, file).await,
        Some(Command::Connect { wallet }) => cmd_connect(&config, wallet).await,
        Some(Command::Disconnect) => cmd_disconnect(&config),
        Some(Command::Status) => cmd_status(&config),
        Some(Command::Wallets) => cmd_wallets(&config),
    }
}

fn build_planner(config: &Config) -> Result<Planner> {
    let client = HttpPlanClient::from_config(&config.planner).context("Failed to create plan client")?;
    Ok(Planner::new(Arc::new(client)))
}

fn load_gate(config: &Config) -> Result<Option<WalletGate>> {
    if !config.wallet.enabled {
        return Ok(None);
    }
    let store = open_store(config)?;
    create_gate(&config.wallet, store).context("Failed to set up wallet gate")
}

async fn cmd_tui(config: &Config) -> Result<()> {
    debug!("cmd_tui: called");
    let planner = build_planner(config)?;
    let gate = load_gate(config)?;
    tui::run(planner, gate, config.wallet.open_redirects).await
}

fn read_tasks(tasks: Option<String>, file: Option<PathBuf>) -> Result<String> {
    if let Some(tasks) = tasks {
        return Ok(tasks);
    }
    if let Some(path) = file {
        return fs::read_to_string(&path).context(format!("Failed to read tasks from {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read tasks from stdin")?;
    Ok(buf)
}

async fn cmd_plan(config: &Config, tasks: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let gate_open = load_gate(config)?.is_none_or(|g| g.is_open());
    // A closed gate refuses before any file or stdin is touched
    let tasks = if gate_open {
        read_tasks(tasks, file)?
    } else {
        tasks.unwrap_or_default()
    };
    debug!(gate_open, tasks_len = tasks.len(), "cmd_plan: called");

    let mut planner = build_planner(config)?;
    planner.update_tasks(tasks);
    let state = planner.submit(gate_open).await;

    if let Some(error) = state.error() {
        eprintln!("{} {}", "✗".red(), error.red());
        std::process::exit(1);
    }
    if let Some(plan) = state.plan() {
        println!("{}", "Your Plan:".bold());
        println!("{}", plan);
    }
    Ok(())
}

async fn cmd_connect(config: &Config, wallet: Option<String>) -> Result<()> {
    debug!(?wallet, "cmd_connect: called");
    let Some(mut gate) = load_gate(config)? else {
        println!("Wallet gate is disabled; planning is always available");
        return Ok(());
    };

    let result = match wallet {
        Some(name) => gate.connect_by_name(&name).await,
        None => {
            let index = gate.first_ready().unwrap_or(0);
            gate.connect(index).await
        }
    };

    match result {
        Ok(ConnectOutcome::Connected(key)) => {
            println!("{} Connected {}", "✓".green(), key.as_str().cyan());
        }
        Ok(ConnectOutcome::Redirect(redirect)) => {
            let verb = match redirect.kind {
                RedirectKind::HandOff => "Continue in",
                RedirectKind::Install => "Install",
            };
            println!("{} {}: {}", verb, redirect.wallet.bold(), redirect.url);
            if config.wallet.open_redirects {
                if let Err(e) = open::that(redirect.url.as_str()) {
                    warn!(error = %e, url = %redirect.url, "Failed to open wallet redirect");
                    eprintln!("Could not open a browser; open the link above manually");
                }
            }
        }
        Err(e) => {
            let message = gate.error().unwrap_or(dailyplanner::wallet::CONNECTION_FAILED_MESSAGE);
            eprintln!("{} {}", "✗".red(), message.red());
            eprintln!("  {}", e);
            if e.is_retryable() {
                eprintln!("  {}", "Approve the request in your wallet and run connect again".dimmed());
            }
            std::process::exit(1);
        }
    }
    Ok(())
}

fn cmd_disconnect(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    store
        .remove(dailyplanner::wallet::CONNECTED_KEY)
        .context("Failed to clear wallet connection")?;
    info!("Wallet connection cleared");
    println!("{} Wallet disconnected", "✓".green());
    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    let gate = load_gate(config)?;
    let gate_line = match &gate {
        None => "disabled".dimmed().to_string(),
        Some(g) if g.is_open() => "open".green().to_string(),
        Some(_) => "closed".yellow().to_string(),
    };

    println!("{:<10} {}", "Gate:".bold(), gate_line);
    if let Some(g) = &gate {
        println!("{:<10} {}", "Device:".bold(), g.device());
        println!(
            "{:<10} {}",
            "Wallets:".bold(),
            if g.is_available() { "available" } else { "none detected" }
        );
        if let Some(key) = g.public_key() {
            println!("{:<10} {}", "Key:".bold(), key);
        }
    }
    println!("{:<10} {}", "Endpoint:".bold(), config.planner.endpoint());
    println!("{:<10} {}", "Session:".bold(), config.storage.session_path.display());
    Ok(())
}

fn cmd_wallets(config: &Config) -> Result<()> {
    for wallet in default_wallets(&config.wallet) {
        let state = wallet.ready_state();
        let marker = if state.is_ready() { "●".green() } else { "○".dimmed() };
        println!("{} {:<12} {}", marker, wallet.name(), state);
    }
    Ok(())
}
