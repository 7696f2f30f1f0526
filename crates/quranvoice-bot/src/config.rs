//! Configuration management for quranvoice-bot

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Telegram specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
    /// Channel whose subscribers may use the bot, "@username" form
    #[serde(default = "default_channel")]
    pub channel: String,
}

/// Catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the SQLite catalog database
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Narrators shown on the recitation menu. Kept as explicit
    /// configuration rather than derived from storage, so narrators
    /// with no stored items still appear.
    #[serde(default = "default_narrators")]
    pub narrators: Vec<String>,
    /// Titles per page on the title list screen
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("BOT_TOKEN").context("BOT_TOKEN not set")?;

        let channel = std::env::var("CHANNEL_USERNAME").unwrap_or_else(|_| default_channel());

        let db_path = std::env::var("QURAN_DB_PATH").unwrap_or_else(|_| default_db_path());

        Ok(Config {
            telegram: TelegramConfig { bot_token, channel },
            catalog: CatalogConfig {
                db_path,
                narrators: default_narrators(),
                page_size: default_page_size(),
            },
        })
    }

    /// Subscription link for the configured channel
    pub fn channel_url(&self) -> String {
        format!("https://t.me/{}", self.telegram.channel.trim_start_matches('@'))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            narrators: default_narrators(),
            page_size: default_page_size(),
        }
    }
}

fn default_bot_token() -> String {
    std::env::var("BOT_TOKEN").unwrap_or_default()
}

fn default_channel() -> String {
    "@quran_voice_1".to_string()
}

fn default_db_path() -> String {
    "quran_voice.db".to_string()
}

fn default_narrators() -> Vec<String> {
    vec![
        "نورين محمد صديق".to_string(),
        "محمد عثمان حاج".to_string(),
    ]
}

fn default_page_size() -> usize {
    10
}
