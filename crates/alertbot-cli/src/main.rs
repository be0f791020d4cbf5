//! Alertbot CLI — entry point.
//!
//! # Commands
//!
//! - `alertbot setup` — generate credentials, save them, register with the relay
//! - `alertbot watch` — show alerts and keep polling the relay until Ctrl+C
//! - `alertbot alerts` — list the most recent alerts
//! - `alertbot clear` — delete all alerts (admin password required)
//! - `alertbot status` — show settings and credential status
//! - `alertbot register` — re-send the registration to the relay

mod alerts_cmd;
mod helpers;
mod setup;
mod status;
mod watch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use alertbot_core::config::{load_config, Config};
use alertbot_core::{AlertLog, ConfigStore, Database, RECENT_LIMIT};
use alertbot_relay::RelayClient;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 💊 Alertbot — medication alerts from CuraX Desktop
#[derive(Parser)]
#[command(name = "alertbot", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// First-time setup: generate Bot ID + API key and register
    Setup {
        /// Device name (prompted if omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Admin password guarding "clear" (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Replace existing credentials
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Show alerts and poll the relay server until Ctrl+C
    Watch,

    /// List the most recent alerts
    Alerts {
        /// Maximum number of alerts to show
        #[arg(short, long, default_value_t = RECENT_LIMIT)]
        limit: usize,
    },

    /// Delete all alerts (requires the admin password)
    Clear {
        /// Admin password (prompted if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show settings and credential status
    Status,

    /// Re-send the registration to the relay server
    Register,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config = load_config(None);

    match cli.command {
        Commands::Setup {
            name,
            password,
            force,
        } => setup::run(&config, name, password, force).await,
        Commands::Watch => watch::run(&config).await,
        Commands::Alerts { limit } => alerts_cmd::list(&config, limit),
        Commands::Clear { password } => alerts_cmd::clear(&config, password),
        Commands::Status => status::run(&config),
        Commands::Register => run_register(&config).await,
    }
}

// ─────────────────────────────────────────────
// Shared wiring
// ─────────────────────────────────────────────

/// Local stores opened from the settings.
pub struct Stores {
    pub config: ConfigStore,
    pub log: AlertLog,
}

/// Open the database named in the settings.
pub fn open_stores(config: &Config) -> Result<Stores> {
    let path = config.storage.resolved_path();
    let db = Database::open(&path)
        .with_context(|| format!("failed to open database: {}", path.display()))?;

    Ok(Stores {
        config: ConfigStore::new(db.clone()),
        log: AlertLog::new(db),
    })
}

/// Build the relay client from the settings.
pub fn build_client(config: &Config) -> Result<RelayClient> {
    RelayClient::from_config(&config.relay).context("failed to create relay client")
}

async fn run_register(config: &Config) -> Result<()> {
    let stores = open_stores(config)?;
    let bot = stores
        .config
        .load()?
        .context("bot is not configured; run `alertbot setup` first")?;

    let client = build_client(config)?;
    client
        .register(&bot)
        .await
        .with_context(|| format!("registration with {} failed", client.server_url()))?;

    helpers::print_success(&format!("Bot {} registered with {}", bot.bot_id, client.server_url()));
    Ok(())
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("alertbot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
