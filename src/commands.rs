use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::client::BackendClient;
use crate::config::Config;
use crate::directory::{AVAILABLE_CROPS, PHILIPPINE_REGIONS};
use crate::handler::InputHandler;
use crate::ui::conversation::ConversationManager;
use crate::ui::App;

/// Launch the interactive chat
pub async fn run_chat(config: Config) -> Result<()> {
    let client = BackendClient::new(&config).context("Failed to create backend client")?;
    info!(backend = client.base_url(), "starting chat");

    let (tx, rx) = mpsc::unbounded_channel();
    let mut manager = ConversationManager::new(&config, client, tx);
    manager.spawn_health_probe();

    let mut app = App::new(config.tick_rate())?;
    app.run(&mut manager, rx).await
}

/// Send a single message and print the bot's reply
pub async fn ask(config: &Config, text: &str) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        println!("❌ Nothing to ask. Try: bukidmate ask \"Central Luzon, Tomato\"");
        return Ok(());
    }

    let client = BackendClient::new(config).context("Failed to create backend client")?;
    let mut handler = InputHandler::new(client);
    let payload = handler.handle(text).await;

    let icon = if payload.is_error() { "❌" } else { "🌱" };
    match payload.message.as_deref().filter(|m| !m.is_empty()) {
        Some(message) => println!("{} {}", icon, message),
        None => println!("{} (no reply)", icon),
    }
    if let Some(follow_up) = payload.follow_up.as_deref().filter(|f| !f.is_empty()) {
        tokio::time::sleep(config.follow_up_delay()).await;
        println!();
        println!("🌱 {}", follow_up);
    }

    Ok(())
}

pub fn list_regions() {
    println!("📍 Philippines Regions:\n");
    for region in PHILIPPINE_REGIONS {
        println!("  • {}", region);
    }
}

pub fn list_crops() {
    println!("🌾 Available Crops:\n");
    for crop in AVAILABLE_CROPS {
        println!("  • {}", crop);
    }
}

/// Query the backend health endpoint
pub async fn health(config: &Config) -> Result<()> {
    let client = BackendClient::new(config).context("Failed to create backend client")?;
    match client.health().await {
        Ok(status) if status.is_healthy() => {
            println!("✅ {} is up: {}", client.base_url(), status);
        }
        Ok(status) => {
            println!("⚠️ {} answered: {}", client.base_url(), status);
        }
        Err(e) => {
            println!("❌ {} is unreachable: {}", client.base_url(), e);
        }
    }
    Ok(())
}
