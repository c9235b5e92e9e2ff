mod config;
mod openai;
mod platform;
mod relay;

use std::sync::Arc;

use anyhow::Result;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::openai::OpenAiClient;
use crate::relay::Relay;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a local .env file, if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,comradebot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!("Configuration loaded successfully");
    info!("  Base URL: {}", config.openai.base_url);
    info!("  Model: {}", config.openai.model);
    info!("  Image model: {}", config.openai.image_model);

    let bot = Bot::new(&config.telegram.bot_token);
    let api = Arc::new(OpenAiClient::new(config.openai));
    let relay = Arc::new(Relay::new(api));

    info!("Bot is starting...");
    platform::telegram::run(bot, relay).await?;

    Ok(())
}
