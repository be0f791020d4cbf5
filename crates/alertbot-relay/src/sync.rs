//! Alert sync loop — polls the relay on a fixed interval and appends to the log.
//!
//! ```text
//! IDLE -> POLLING -> (APPEND_NEW | IDLE) -> sleep(interval) -> POLLING ...
//! ```
//!
//! A failed cycle is logged and skipped; the next one runs after the same
//! delay. The loop ends once the running flag of its [`SyncContext`] is
//! cleared, which is checked once per iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Notify};
use tracing::{debug, error, info, warn};

use alertbot_core::bus::SyncEvent;
use alertbot_core::{Alert, AlertLog, BotConfig};

use crate::client::AlertSource;

/// Default delay between two polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

// ─────────────────────────────────────────────
// State + outcome
// ─────────────────────────────────────────────

/// Where the loop currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Polling,
    AppendNew,
    Stopped,
}

/// Result of a single poll cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// This many alerts were stored and a refresh event was sent.
    Appended(usize),
    /// The relay had nothing pending.
    Empty,
    /// Fetch or storage failed; nothing was stored.
    Skipped,
}

// ─────────────────────────────────────────────
// SyncContext
// ─────────────────────────────────────────────

/// Everything a sync loop needs: credentials, the log, and the running flag.
#[derive(Clone, Debug)]
pub struct SyncContext {
    pub config: BotConfig,
    pub log: AlertLog,
    running: Arc<AtomicBool>,
}

impl SyncContext {
    pub fn new(config: BotConfig, log: AlertLog) -> Self {
        SyncContext {
            config,
            log,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Clear the running flag; the loop exits at its next check.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

// ─────────────────────────────────────────────
// AlertSyncLoop
// ─────────────────────────────────────────────

/// Fixed-interval poll of an [`AlertSource`] into the local [`AlertLog`].
pub struct AlertSyncLoop {
    ctx: SyncContext,
    source: Arc<dyn AlertSource>,
    /// Refresh events for the display side.
    events: mpsc::Sender<SyncEvent>,
    interval: Duration,
    state: watch::Sender<SyncState>,
    /// Wakes the sleep early on `stop()`.
    wake: Notify,
}

impl AlertSyncLoop {
    pub fn new(
        ctx: SyncContext,
        source: Arc<dyn AlertSource>,
        events: mpsc::Sender<SyncEvent>,
        interval: Option<Duration>,
    ) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            ctx,
            source,
            events,
            interval: interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            state,
            wake: Notify::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Run the loop until `stop()` is called.
    pub async fn start(&self) {
        info!(
            source = self.source.display_name(),
            bot_id = %self.ctx.config.bot_id,
            interval_ms = self.interval.as_millis() as u64,
            "alert sync started"
        );

        while self.ctx.is_running() {
            self.poll_once().await;

            if !self.ctx.is_running() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.wake.notified() => {
                    debug!("alert sync woken early");
                }
            }
        }

        self.state.send_replace(SyncState::Stopped);
        info!("alert sync stopped");
    }

    /// Stop the loop.
    pub fn stop(&self) {
        info!("stopping alert sync");
        self.ctx.request_stop();
        // notify_one keeps a permit if the loop is not sleeping yet
        self.wake.notify_one();
    }

    /// Run exactly one poll cycle.
    pub async fn poll_once(&self) -> CycleOutcome {
        self.state.send_replace(SyncState::Polling);

        let outcome = match self.source.fetch_alerts(&self.ctx.config).await {
            Err(e) => {
                warn!(source = self.source.display_name(), error = %e, "alert check failed");
                CycleOutcome::Skipped
            }
            Ok(alerts) if alerts.is_empty() => {
                debug!("no pending alerts");
                CycleOutcome::Empty
            }
            Ok(alerts) => {
                self.state.send_replace(SyncState::AppendNew);

                let log = self.ctx.log.clone();
                match tokio::task::spawn_blocking(move || log.append_all(&alerts)).await {
                    Ok(Ok(stored)) => {
                        let count = stored.len();
                        self.publish(stored);
                        CycleOutcome::Appended(count)
                    }
                    Ok(Err(e)) => {
                        error!(error = %e, "failed to store fetched alerts");
                        CycleOutcome::Skipped
                    }
                    Err(e) => {
                        error!(error = %e, "alert store task failed");
                        CycleOutcome::Skipped
                    }
                }
            }
        };

        self.state.send_replace(SyncState::Idle);
        outcome
    }

    /// Never waits on the display. A full queue already holds a pending refresh,
    /// and the display re-reads the log on each one.
    fn publish(&self, stored: Vec<Alert>) {
        let count = stored.len();
        match self.events.try_send(SyncEvent::alerts_appended(stored)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(count, "display busy; refresh already queued");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(count, "no display listening; refresh event dropped");
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
