//! Runtime configuration — backend/frontend origins, polling cadence, hotkey.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file via `dotenvy` (see `load_dotenv`). Anything unset falls back to the
//! production defaults.

use std::time::Duration;

pub const PRODUCTION_BACKEND_URL: &str = "https://api.snelterecht.nl";
pub const STAGING_BACKEND_URL: &str = "http://localhost:5001";
pub const FRONTEND_URL: &str = "https://app.snelterecht.nl";

/// Update checks run this often until an update is found.
pub const UPDATE_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Pause between "update downloaded" and the restart into the new version.
pub const RESTART_DELAY: Duration = Duration::from_millis(3500);

pub const CAPTURE_HOTKEY: &str = "CommandOrControl+Shift+S";

/// Captures are fitted into this box before upload.
pub const CAPTURE_WIDTH: u32 = 1920;
pub const CAPTURE_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub frontend_url: String,
    pub update_poll_interval: Duration,
    pub restart_delay: Duration,
    pub hotkey: String,
    pub start_minimized: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: PRODUCTION_BACKEND_URL.to_string(),
            frontend_url: FRONTEND_URL.to_string(),
            update_poll_interval: UPDATE_POLL_INTERVAL,
            restart_delay: RESTART_DELAY,
            hotkey: CAPTURE_HOTKEY.to_string(),
            start_minimized: false,
        }
    }
}

impl AppConfig {
    /// Load from the real process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Invalid values are logged and ignored so a typo in `.env` never keeps
    /// the tray app from starting.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if lookup("STAGING").as_deref() == Some("true") {
            config.backend_url = STAGING_BACKEND_URL.to_string();
        }

        if let Some(url) = lookup("SNELTERECHT_BACKEND_URL") {
            match parse_origin(&url) {
                Ok(origin) => config.backend_url = origin,
                Err(e) => log::warn!("[CONFIG] Ignoring SNELTERECHT_BACKEND_URL: {}", e),
            }
        }

        if let Some(url) = lookup("SNELTERECHT_FRONTEND_URL") {
            match parse_origin(&url) {
                Ok(origin) => config.frontend_url = origin,
                Err(e) => log::warn!("[CONFIG] Ignoring SNELTERECHT_FRONTEND_URL: {}", e),
            }
        }

        if let Some(raw) = lookup("SNELTERECHT_UPDATE_INTERVAL_SECS") {
            match parse_interval(&raw) {
                Ok(interval) => config.update_poll_interval = interval,
                Err(e) => log::warn!("[CONFIG] Ignoring SNELTERECHT_UPDATE_INTERVAL_SECS: {}", e),
            }
        }

        if let Some(hotkey) = lookup("SNELTERECHT_HOTKEY") {
            if !hotkey.trim().is_empty() {
                config.hotkey = hotkey.trim().to_string();
            }
        }

        config.start_minimized = lookup("START_MINIMIZED").is_some_and(|v| !v.is_empty());

        config
    }
}

/// Seed the process environment from a `.env` file, if there is one.
///
/// Runs before the logger exists, so the caller logs the returned path.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}

fn parse_origin(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidInterval(raw.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidInterval(raw.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("'{value}' is not a usable origin: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("'{0}' is not a positive number of seconds")]
    InvalidInterval(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_to_production() {
        let config = config_from(&[]);
        assert_eq!(config.backend_url, PRODUCTION_BACKEND_URL);
        assert_eq!(config.frontend_url, FRONTEND_URL);
        assert_eq!(config.update_poll_interval, Duration::from_secs(10));
        assert_eq!(config.restart_delay, Duration::from_millis(3500));
        assert_eq!(config.hotkey, "CommandOrControl+Shift+S");
        assert!(!config.start_minimized);
    }

    #[test]
    fn start_minimized_flag() {
        assert!(config_from(&[("START_MINIMIZED", "true")]).start_minimized);
        assert!(!config_from(&[("START_MINIMIZED", "")]).start_minimized);
    }

    #[test]
    fn staging_flag_selects_local_backend() {
        let config = config_from(&[("STAGING", "true")]);
        assert_eq!(config.backend_url, STAGING_BACKEND_URL);
        // Frontend origin is fixed regardless of staging
        assert_eq!(config.frontend_url, FRONTEND_URL);
    }

    #[test]
    fn staging_flag_must_be_exactly_true() {
        let config = config_from(&[("STAGING", "1")]);
        assert_eq!(config.backend_url, PRODUCTION_BACKEND_URL);
    }

    #[test]
    fn backend_override_strips_trailing_slash() {
        let config = config_from(&[("SNELTERECHT_BACKEND_URL", "https://example.test/")]);
        assert_eq!(config.backend_url, "https://example.test");
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = config_from(&[
            ("SNELTERECHT_BACKEND_URL", "ftp://nope"),
            ("SNELTERECHT_UPDATE_INTERVAL_SECS", "0"),
            ("SNELTERECHT_HOTKEY", "   "),
        ]);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn interval_override_is_parsed() {
        let config = config_from(&[("SNELTERECHT_UPDATE_INTERVAL_SECS", "60")]);
        assert_eq!(config.update_poll_interval, Duration::from_secs(60));
    }
}
