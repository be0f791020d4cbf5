//! Append-only alert log backed by the `alerts` table.

use rusqlite::{params, Connection, Row};
use tracing::{debug, info, warn};

use super::config_store::ConfigStore;
use super::database::Database;
use super::error::StoreError;
use crate::types::{Alert, IncomingAlert, Priority};
use crate::utils;

/// How many alerts the display side shows.
pub const RECENT_LIMIT: usize = 50;

/// Append/query/clear access to the `alerts` table.
#[derive(Clone, Debug)]
pub struct AlertLog {
    db: Database,
}

impl AlertLog {
    pub fn new(db: Database) -> Self {
        AlertLog { db }
    }

    /// Append a single alert, stamped with the current local time.
    pub fn append(&self, alert: &IncomingAlert) -> Result<Alert, StoreError> {
        let conn = self.db.connect()?;
        let stored = insert(&conn, alert, &utils::alert_timestamp())?;
        info!(id = stored.id, alert_type = %stored.alert_type, "new alert saved");
        Ok(stored)
    }

    /// Append a batch of alerts in one transaction.
    ///
    /// Every item is stored; no de-duplication is attempted.
    pub fn append_all(&self, alerts: &[IncomingAlert]) -> Result<Vec<Alert>, StoreError> {
        if alerts.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;
        let timestamp = utils::alert_timestamp();

        let mut stored = Vec::with_capacity(alerts.len());
        for alert in alerts {
            stored.push(insert(&tx, alert, &timestamp)?);
        }
        tx.commit()?;

        info!(count = stored.len(), "new alerts saved");
        Ok(stored)
    }

    /// Most recent alerts first, at most `limit` of them.
    pub fn recent(&self, limit: usize) -> Result<Vec<Alert>, StoreError> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, alert_type, priority, message, timestamp, read
             FROM alerts
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map([sql_limit(limit)], row_to_alert)?;
        let alerts = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = alerts.len(), limit, "loaded recent alerts");
        Ok(alerts)
    }

    /// Alerts with an id greater than `after_id`, newest first.
    pub fn newer_than(&self, after_id: i64) -> Result<Vec<Alert>, StoreError> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, alert_type, priority, message, timestamp, read
             FROM alerts
             WHERE id > ?1
             ORDER BY id DESC",
        )?;

        let rows = stmt.query_map([after_id], row_to_alert)?;
        let alerts = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = alerts.len(), after_id, "loaded new alerts");
        Ok(alerts)
    }

    /// Number of alerts in the log.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.db.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM alerts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete every alert, gated by the stored admin password.
    ///
    /// Returns the number of deleted alerts.
    pub fn clear_all(&self, supplied_password: &str, config: &ConfigStore) -> Result<usize, StoreError> {
        let bot_config = config.load()?.ok_or(StoreError::NotConfigured)?;

        if supplied_password != bot_config.admin_password {
            warn!("clear-all rejected: incorrect admin password");
            return Err(StoreError::WrongPassword);
        }

        let conn = self.db.connect()?;
        let deleted = conn.execute("DELETE FROM alerts", [])?;
        info!(deleted, "all alerts cleared");
        Ok(deleted)
    }
}

fn insert(conn: &Connection, alert: &IncomingAlert, timestamp: &str) -> Result<Alert, StoreError> {
    conn.execute(
        "INSERT INTO alerts (alert_type, priority, message, timestamp)
         VALUES (?1, ?2, ?3, ?4)",
        params![alert.alert_type, alert.priority.as_str(), alert.message, timestamp],
    )?;

    Ok(Alert {
        id: conn.last_insert_rowid(),
        alert_type: alert.alert_type.clone(),
        priority: alert.priority,
        message: alert.message.clone(),
        timestamp: timestamp.to_string(),
        read: false,
    })
}

/// SQLite reads a negative LIMIT as "no limit"; saturate instead of wrapping.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn row_to_alert(row: &Row<'_>) -> rusqlite::Result<Alert> {
    let priority: Option<String> = row.get(2)?;
    let read: Option<i64> = row.get(5)?;

    Ok(Alert {
        id: row.get(0)?,
        alert_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        priority: priority.as_deref().map(Priority::parse_lenient).unwrap_or_default(),
        message: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        timestamp: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        read: read.unwrap_or(0) != 0,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
