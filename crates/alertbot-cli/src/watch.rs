//! Watch command — shows stored alerts and keeps the sync loop running.
//!
//! Startup sequence:
//! 1. Open the database and load the bot credentials
//! 2. Create the event bus and the sync loop
//! 3. Print the latest alerts
//! 4. Run: sync loop on its own task, this task re-reads the log on each refresh event
//! 5. Handle Ctrl+C for graceful shutdown

use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use alertbot_core::bus::EventBus;
use alertbot_core::config::Config;
use alertbot_core::{Alert, AlertLog, StoreError, RECENT_LIMIT};
use alertbot_relay::{AlertSyncLoop, SyncContext};

use crate::helpers;

/// Run the watch command until Ctrl+C.
pub async fn run(config: &Config) -> Result<()> {
    helpers::print_banner("Mode: Watch");

    // 1. Stores + credentials
    let stores = crate::open_stores(config)?;
    let bot = stores
        .config
        .load()?
        .context("bot is not configured; run `alertbot setup` first")?;

    // 2. Relay client, bus, sync loop
    let client = crate::build_client(config)?;
    let server_url = client.server_url().to_string();
    let bus = EventBus::default();
    let ctx = SyncContext::new(bot.clone(), stores.log.clone());
    let sync = Arc::new(AlertSyncLoop::new(
        ctx,
        Arc::new(client),
        bus.sender(),
        Some(config.relay.poll_interval()),
    ));

    // 3. Header + current alerts
    println!("  Bot ID:    {}", bot.bot_id.bold());
    println!("  Relay:     {}", server_url);
    println!("  Interval:  every {}s", sync.interval().as_secs());
    println!();
    let initial = stores.log.recent(RECENT_LIMIT)?;
    helpers::print_alert_list(&initial);
    println!("  Ctrl+C to stop");
    println!();

    let mut view = AlertView::new(stores.log.clone(), &initial);
    info!(bot_id = %bot.bot_id, relay = %server_url, "watch starting");

    // 4. Sync loop on its own task; this task only renders
    let worker = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.start().await })
    };

    loop {
        tokio::select! {
            event = bus.consume() => {
                if event.is_none() {
                    break;
                }
                // Events are only a signal; the log is the source of truth
                let _ = bus.drain().await;
                match view.refresh() {
                    Ok(fresh) => print_new_alerts(&fresh),
                    Err(e) => helpers::print_error(&format!("failed to read alerts: {e}")),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("  Shutting down...");
                info!("received Ctrl+C, shutting down");
                break;
            }
        }
    }

    // 5. Stop the worker; it exits at its next flag check
    sync.stop();
    if let Err(e) = worker.await {
        helpers::print_error(&format!("sync worker failed: {e}"));
    }

    println!("  Watch stopped. Goodbye!");
    Ok(())
}

/// Tracks the newest alert already on screen.
struct AlertView {
    log: AlertLog,
    last_shown: i64,
}

impl AlertView {
    fn new(log: AlertLog, shown: &[Alert]) -> Self {
        let last_shown = shown.iter().map(|a| a.id).max().unwrap_or(0);
        Self { log, last_shown }
    }

    /// Alerts stored since the last refresh, newest first.
    fn refresh(&mut self) -> Result<Vec<Alert>, StoreError> {
        let fresh = self.log.newer_than(self.last_shown)?;
        if let Some(newest) = fresh.first() {
            self.last_shown = newest.id;
        }
        Ok(fresh)
    }
}

fn print_new_alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        return;
    }
    let noun = if alerts.len() == 1 { "alert" } else { "alerts" };
    println!("  {}", format!("── {} new {} ──", alerts.len(), noun).cyan());
    helpers::print_alert_list(alerts);
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alertbot_core::{BotConfig, Database, IncomingAlert, Priority};
    use alertbot_relay::{AlertSource, CycleOutcome, RelayError};
    use async_trait::async_trait;

    struct OneAlertSource;

    #[async_trait]
    impl AlertSource for OneAlertSource {
        async fn fetch_alerts(&self, _config: &BotConfig) -> Result<Vec<IncomingAlert>, RelayError> {
            Ok(vec![IncomingAlert::new("Dose Due", "Metformin 500mg", Priority::Low)])
        }

        fn display_name(&self) -> &str {
            "one-alert"
        }
    }

    fn temp_log() -> (tempfile::TempDir, AlertLog) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("alerts.db")).unwrap();
        (dir, AlertLog::new(db))
    }

    #[tokio::test]
    async fn full_bus_still_shows_every_stored_alert() {
        let (_dir, log) = temp_log();
        let mut view = AlertView::new(log.clone(), &log.recent(RECENT_LIMIT).unwrap());

        let bus = EventBus::default();
        let ctx = SyncContext::new(BotConfig::new("0A1B2C3D", "key", "pw"), log.clone());
        let sync = AlertSyncLoop::new(ctx, Arc::new(OneAlertSource), bus.sender(), None);

        // More cycles than the bus can buffer before the display wakes up
        for _ in 0..40 {
            assert_eq!(sync.poll_once().await, CycleOutcome::Appended(1));
        }

        assert!(bus.consume().await.is_some());
        let _ = bus.drain().await;
        let shown = view.refresh().unwrap();

        assert_eq!(shown.len(), 40);
        assert_eq!(shown.len(), log.count().unwrap());
        assert!(shown.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn refresh_skips_alerts_already_shown() {
        let (_dir, log) = temp_log();
        let first = log
            .append(&IncomingAlert::new("Missed Dose", "Atorvastatin", Priority::High))
            .unwrap();
        let mut view = AlertView::new(log.clone(), &[first]);

        assert!(view.refresh().unwrap().is_empty());

        let second = log
            .append(&IncomingAlert::new("Dose Due", "Aspirin", Priority::Low))
            .unwrap();
        let fresh = view.refresh().unwrap();
        assert_eq!(fresh, vec![second]);
        assert!(view.refresh().unwrap().is_empty());
    }

    #[test]
    fn empty_log_starts_from_zero() {
        let (_dir, log) = temp_log();
        let mut view = AlertView::new(log.clone(), &[]);
        log.append(&IncomingAlert::new("Dose Due", "Aspirin", Priority::Low))
            .unwrap();
        assert_eq!(view.refresh().unwrap().len(), 1);
    }
}
