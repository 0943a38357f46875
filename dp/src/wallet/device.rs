//! Device-class detection from a user agent string

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::WalletConfig;

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini").expect("valid mobile regex")
});

/// Coarse device class used to choose between direct connect and hand-off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Classify a user agent; anything unrecognized is desktop
    pub fn detect(user_agent: &str) -> Self {
        let class = if MOBILE_RE.is_match(user_agent) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        };
        debug!(%user_agent, ?class, "DeviceClass::detect");
        class
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Mobile => f.write_str("mobile"),
            DeviceClass::Desktop => f.write_str("desktop"),
        }
    }
}

/// User agent describing this process, e.g. `DailyPlanner/0.1.0 (linux; x86_64)`
///
/// Termux reports `linux`, so its marker variable maps to Android.
pub fn default_user_agent() -> String {
    let os = if std::env::var_os("TERMUX_VERSION").is_some() {
        "Android"
    } else {
        match std::env::consts::OS {
            "android" => "Android",
            "ios" => "iPhone; iOS",
            other => other,
        }
    };
    format!(
        "DailyPlanner/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        os,
        std::env::consts::ARCH
    )
}

/// Configured user agent if set, otherwise the synthesized one
pub fn resolve_user_agent(config: &WalletConfig) -> String {
    config
        .user_agent
        .as_ref()
        .filter(|ua| !ua.trim().is_empty())
        .cloned()
        .unwrap_or_else(default_user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mobile_agents() {
        let agents = [
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (Linux; Android 14; Pixel 8)",
            "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X)",
            "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)",
            "DailyPlanner/0.1.0 (Android; aarch64)",
            "mozilla/5.0 (linux; android 13)",
        ];
        for ua in agents {
            assert_eq!(DeviceClass::detect(ua), DeviceClass::Mobile, "{}", ua);
        }
    }

    #[test]
    fn test_detect_desktop_agents() {
        let agents = [
            "Mozilla/5.0 (X11; Linux x86_64)",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)",
            "DailyPlanner/0.1.0 (linux; x86_64)",
            "",
        ];
        for ua in agents {
            assert_eq!(DeviceClass::detect(ua), DeviceClass::Desktop, "{}", ua);
        }
    }

    #[test]
    fn test_resolve_prefers_config() {
        let config = WalletConfig {
            user_agent: Some("Mozilla/5.0 (iPhone)".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_user_agent(&config), "Mozilla/5.0 (iPhone)");

        let blank = WalletConfig {
            user_agent: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(resolve_user_agent(&blank).starts_with("DailyPlanner/"));
    }
}
