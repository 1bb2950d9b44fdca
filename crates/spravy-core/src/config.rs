use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SpravyError;

/// Top-level Spravy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    /// Bot API token. The `TELEGRAM_BOT_TOKEN` env var takes precedence.
    #[serde(default)]
    pub bot_token: String,
}

/// Store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Reminder delivery settings.
///
/// The scan period is fixed at one hour; only the daytime delivery window
/// is configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Window start, inclusive (e.g. "09:00").
    #[serde(default = "default_window_start")]
    pub window_start: String,
    /// Window end, inclusive (e.g. "22:00").
    #[serde(default = "default_window_end")]
    pub window_end: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window_start: default_window_start(),
            window_end: default_window_end(),
        }
    }
}

// --- Default value functions ---

fn default_db_path() -> String {
    "~/.spravy/spravy.db".to_string()
}
fn default_window_start() -> String {
    "09:00".to_string()
}
fn default_window_end() -> String {
    "22:00".to_string()
}

/// Normalize a window bound to zero-padded `HH:MM`. The gateway compares
/// these lexicographically, so an unpadded `9:00` would sort after `22:00`.
fn normalize_window(value: &str) -> Result<String, SpravyError> {
    let time = chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| SpravyError::Config(format!("invalid reminder window '{value}': {e}")))?;
    Ok(time.format("%H:%M").to_string())
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file is missing. The bot token may come from the `TELEGRAM_BOT_TOKEN`
/// env var; an absent token is a fatal startup error.
pub fn load(path: &str) -> Result<Config, SpravyError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpravyError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| SpravyError::Config(format!("failed to parse config: {e}")))?
    } else {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
        if !token.is_empty() {
            config.telegram.bot_token = token;
        }
    }

    config.reminders.window_start = normalize_window(&config.reminders.window_start)?;
    config.reminders.window_end = normalize_window(&config.reminders.window_end)?;

    if config.telegram.bot_token.is_empty() {
        return Err(SpravyError::Config(
            "bot token missing: set TELEGRAM_BOT_TOKEN or telegram.bot_token in config.toml"
                .into(),
        ));
    }

    Ok(config)
}
