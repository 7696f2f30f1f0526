//! Quran Voice Telegram Bot
//!
//! Menu-driven delivery bot for Quran recitations and lectures.
//! Access is gated on membership in a Telegram channel; the catalog
//! lives in SQLite and audio is delivered by stored Telegram file id.

mod config;
mod context;
mod errors;
mod gate;
mod handlers;
mod navigator;
mod store;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::context::NavigationContexts;
use crate::gate::SubscriptionGate;
use crate::handlers::AppState;
use crate::navigator::Navigator;
use crate::store::CatalogStore;

/// Quran Voice bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/quranvoice-bot.toml")]
    config: String,

    /// Telegram bot token (overrides config file)
    #[arg(long, env = "BOT_TOKEN")]
    bot_token: Option<String>,

    /// Gate channel, "@username" form (overrides config file)
    #[arg(long, env = "CHANNEL_USERNAME")]
    channel: Option<String>,

    /// Path to the SQLite catalog (overrides config file)
    #[arg(long, env = "QURAN_DB_PATH")]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quranvoice_bot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Quran Voice bot");

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using environment variables");
        Config::from_env()?
    };

    // Override with CLI arguments
    if let Some(bot_token) = args.bot_token {
        config.telegram.bot_token = bot_token;
    }
    if let Some(channel) = args.channel {
        config.telegram.channel = channel;
    }
    if let Some(db_path) = args.db_path {
        config.catalog.db_path = db_path;
    }

    if config.telegram.bot_token.is_empty() {
        return Err(errors::Error::Config(
            "no bot token configured (set BOT_TOKEN or the config file)".to_string(),
        )
        .into());
    }
    if config.catalog.page_size == 0 {
        return Err(errors::Error::Config("catalog.page_size must be at least 1".to_string()).into());
    }

    info!("Configuration loaded successfully");
    info!("Gate channel: {}", config.telegram.channel);
    info!("Catalog database: {}", config.catalog.db_path);

    // Open the catalog
    let store = CatalogStore::open(&config.catalog.db_path)?;

    // Create Telegram bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram.bot_token);

    // Verify bot token
    match bot.get_me().await {
        Ok(me) => info!("Bot authenticated as: @{}", me.username()),
        Err(e) => {
            error!("Failed to authenticate bot: {}", e);
            return Err(e.into());
        }
    }

    let gate = SubscriptionGate::new(bot.clone(), config.telegram.channel.clone());
    let navigator = Navigator::new(
        store,
        NavigationContexts::default(),
        config.catalog.narrators.clone(),
        config.catalog.page_size,
        config.channel_url(),
    );
    let state = Arc::new(AppState { navigator, gate });

    info!("Bot initialized, starting dispatcher...");
    Dispatcher::builder(bot, handlers::build_handler())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}
