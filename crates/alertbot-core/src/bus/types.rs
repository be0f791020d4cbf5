//! Events flowing from the sync worker to the display side.

use chrono::{DateTime, Utc};

use crate::types::Alert;

/// An event published by the sync worker.
#[derive(Clone, Debug)]
pub enum SyncEvent {
    /// At least one alert was appended to the log; the display should refresh.
    AlertsAppended {
        /// The rows that were just stored, in insertion order.
        alerts: Vec<Alert>,
        /// When the cycle that stored them finished.
        at: DateTime<Utc>,
    },
}

impl SyncEvent {
    pub fn alerts_appended(alerts: Vec<Alert>) -> Self {
        SyncEvent::AlertsAppended {
            alerts,
            at: Utc::now(),
        }
    }

    /// Number of alerts carried by this event.
    pub fn alert_count(&self) -> usize {
        match self {
            SyncEvent::AlertsAppended { alerts, .. } => alerts.len(),
        }
    }
}
