mod bot;
mod commands;
mod config;
mod markdown;
mod platform;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::config::Config;
use crate::store::PhraseStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,utphrase=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A missing .env is fine: the token may come from the real environment
    if let Err(e) = dotenvy::dotenv() {
        info!("No .env loaded: {}", e);
    }

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let token = config.bot_token()?;

    let store = PhraseStore::new(config.store.path.clone());

    info!("Configuration loaded successfully");
    info!("  Phrase store: {}", store.path().display());
    info!("  Poll timeout: {}s", config.telegram.poll_timeout_secs);
    info!("  Slap roster: {} names", config.slap.targets.len());

    let state = Arc::new(AppState::new(store, config.slap.clone()));

    info!("Bot is starting...");
    platform::telegram::run(state, &token, config.telegram.poll_timeout()).await?;

    Ok(())
}
