//! `alertbot setup` — first-time configuration.
//!
//! - Asks for a device name and an admin password
//! - Generates a Bot ID and API key
//! - Saves them to the local database and registers with the relay
//! - Prints the values to enter in CuraX Desktop

use anyhow::{bail, Result};
use colored::Colorize;
use tracing::info;

use alertbot_core::config::Config;
use alertbot_core::{BotConfig, ConfigStore};
use alertbot_relay::RelayClient;

use crate::helpers;

/// Run the setup command.
pub async fn run(
    config: &Config,
    name: Option<String>,
    password: Option<String>,
    force: bool,
) -> Result<()> {
    helpers::print_banner("Setup");

    let stores = crate::open_stores(config)?;

    if !force {
        if let Some(existing) = stores.config.load()? {
            helpers::print_success(&format!("already configured (Bot ID: {})", existing.bot_id));
            println!("  {}", "Use --force to generate new credentials.".dimmed());
            println!();
            return Ok(());
        }
    }

    let name = helpers::value_or_prompt(name, "Device name")?;
    let password = helpers::secret_or_prompt(password, "Admin password")?;
    let (name, password) = validate_inputs(&name, &password)?;

    let client = crate::build_client(config)?;
    let bot = complete_setup(&stores.config, &client, &name, &password).await?;

    print_credentials(&bot);
    Ok(())
}

/// Trim and require both fields.
fn validate_inputs(name: &str, password: &str) -> Result<(String, String)> {
    let name = name.trim();
    let password = password.trim();
    if name.is_empty() || password.is_empty() {
        bail!("Please fill in all fields");
    }
    Ok((name.to_string(), password.to_string()))
}

/// Fresh credentials: an 8-character upper-case Bot ID and a UUID API key.
fn generate_credentials(admin_password: &str) -> BotConfig {
    let bot_id: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect::<String>()
        .to_uppercase();
    let api_key = uuid::Uuid::new_v4().to_string();

    BotConfig::new(bot_id, api_key, admin_password)
}

/// Generate, save, and register. Registration failures are logged only.
async fn complete_setup(
    store: &ConfigStore,
    client: &RelayClient,
    name: &str,
    admin_password: &str,
) -> Result<BotConfig> {
    let bot = generate_credentials(admin_password);
    store.save(&bot)?;
    info!(device = %name, bot_id = %bot.bot_id, "setup complete");

    if !client.register_fire_and_forget(&bot).await {
        println!(
            "  {}",
            "Could not reach the relay server; alerts will arrive once it is reachable.".yellow()
        );
    }

    Ok(bot)
}

fn print_credentials(bot: &BotConfig) {
    println!();
    helpers::print_success("Setup complete!");
    println!();
    println!("  {}", "Enter these in CuraX Desktop:".bold());
    println!();
    println!("  {:<10} {}", "Bot ID:".blue(), bot.bot_id);
    println!("  {:<10} {}", "API Key:".blue(), bot.api_key);
    println!();
    println!(
        "  {}",
        "Copy these values into CuraX → Settings → Alert Bot, then run `alertbot watch`.".dimmed()
    );
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
