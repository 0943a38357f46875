//! DailyPlanner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `planner.base-url`
pub const BACKEND_URL_ENV: &str = "DAILYPLANNER_BACKEND_URL";

/// Default planning service
pub const DEFAULT_BASE_URL: &str = "https://todoai-wn6s.onrender.com";

/// Main DailyPlanner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Planning service endpoint
    pub planner: PlannerConfig,

    /// Wallet gate configuration
    pub wallet: WalletConfig,

    /// Storage configuration
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_without_env(config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// Read only the log level, before logging is set up
    ///
    /// Parse failures are swallowed here; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::candidate_paths(config_path)
            .into_iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_without_env(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::candidate_paths(None) {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn candidate_paths(config_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = config_path {
            return vec![path.clone()];
        }

        // Project-local .dailyplanner.yml, then ~/.config/dailyplanner/dailyplanner.yml
        let mut paths = vec![PathBuf::from(".dailyplanner.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dailyplanner").join("dailyplanner.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                tracing::info!("Using {} from environment: {}", BACKEND_URL_ENV, url);
                self.planner.base_url = url.to_string();
            }
        }
    }
}

/// Planning service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Service base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Endpoint path appended to the base URL
    pub path: String,

    /// Request timeout in milliseconds (none by default)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl PlannerConfig {
    /// Full endpoint URL, tolerant of trailing/leading slashes
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: "/plan-day".to_string(),
            timeout_ms: None,
        }
    }
}

/// Wallet gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Require a connected wallet before planning
    pub enabled: bool,

    /// User agent used for device detection (synthesized when unset)
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// URL handed to mobile wallet apps when deep-linking
    #[serde(rename = "dapp-url")]
    pub dapp_url: String,

    /// Mobile wallet apps known to be installed (e.g. phantom, solflare)
    #[serde(rename = "installed-apps")]
    pub installed_apps: Vec<String>,

    /// Program + args that print the Solana CLI wallet address
    #[serde(rename = "solana-command")]
    pub solana_command: Vec<String>,

    /// Open redirect URLs with the system handler
    #[serde(rename = "open-redirects")]
    pub open_redirects: bool,
}

impl WalletConfig {
    /// Whether the named app is listed as installed (case-insensitive)
    pub fn is_installed(&self, app: &str) -> bool {
        self.installed_apps.iter().any(|a| a.eq_ignore_ascii_case(app))
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: None,
            dapp_url: DEFAULT_BASE_URL.to_string(),
            installed_apps: Vec::new(),
            solana_command: vec!["solana".to_string(), "address".to_string()],
            open_redirects: true,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session file holding the persisted connected flag
    #[serde(rename = "session-path")]
    pub session_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dailyplanner")
                .join(sessionstore::DEFAULT_FILE_NAME),
        }
    }
}
