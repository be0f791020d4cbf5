//! `alertbot status` — show settings, credentials, and log size.

use anyhow::Result;
use colored::Colorize;

use alertbot_core::config::{get_config_path, Config};

use crate::helpers::display_path;

/// Run the status command.
pub fn run(config: &Config) -> Result<()> {
    let config_path = get_config_path();
    let db_path = config.storage.resolved_path();

    println!();
    println!("{}", "💊 Alertbot Status".cyan().bold());
    println!();

    // Settings file
    println!(
        "  {:<18} {} {}",
        "Settings:".bold(),
        display_path(&config_path),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(defaults)".dimmed().to_string()
        }
    );

    // Relay
    println!("  {:<18} {}", "Relay server:".bold(), config.relay.server_url);
    println!(
        "  {:<18} {}",
        "Poll interval:".bold(),
        format!("{}s", config.relay.poll_interval().as_secs()).dimmed()
    );

    // Database + credentials
    let stores = crate::open_stores(config)?;
    println!(
        "  {:<18} {} {}",
        "Database:".bold(),
        display_path(&db_path),
        "✓".green()
    );

    println!();
    match stores.config.load()? {
        Some(bot) => {
            println!("  {:<18} {}", "Bot ID:".bold(), bot.bot_id);
            println!("  {:<18} {}", "Credentials:".bold(), format!("{} (configured)", "✓".green()));
        }
        None => {
            println!(
                "  {:<18} {}",
                "Credentials:".bold(),
                "· not configured (run `alertbot setup`)".dimmed()
            );
        }
    }

    println!("  {:<18} {}", "Stored alerts:".bold(), stores.log.count()?);
    println!();

    Ok(())
}
