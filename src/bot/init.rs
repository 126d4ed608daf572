use crate::bot::Handler;
use crate::bot::console::OwnerConsole;
use crate::utils::config::Config;
use crate::utils::credentials;
use anyhow::{Context as _, Result};
use serenity::prelude::*;
use std::sync::Arc;

/// Initialize and start the Discord bot
pub async fn start_bot() -> Result<()> {
    tracing::info!("[INIT] Starting ticket desk bot");

    let config = Arc::new(Config::from_env()?);
    let token = credentials::load_token(&config.token_file)?;
    let handler = Handler::new(config.clone()).await?;

    let cooldowns = handler.cooldowns.clone();
    let sweep_every = config.cooldown_sweep_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            let removed = cooldowns.sweep();
            if removed > 0 {
                tracing::debug!("[COOLDOWN] Swept {} expired entries", removed);
            }
        }
    });

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await
        .context("Error creating client")?;

    if config.owner_console {
        let console = OwnerConsole::new(
            client.http.clone(),
            config.clone(),
            client.shard_manager.clone(),
        );
        tokio::spawn(async move {
            if let Err(e) = console.run().await {
                tracing::error!("[CONSOLE] Owner panel stopped: {:#}", e);
            }
        });
    }

    if let Err(why) = client.start().await {
        tracing::error!("[ERROR] Discord client error: {why:?}");
    }

    Ok(())
}
