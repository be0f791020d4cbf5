//! Alert types shared by the store, the relay client, and the CLI.
//!
//! `IncomingAlert` is the wire shape returned by the relay server
//! (`{alert_type, message, priority}`); `Alert` is a row of the local log.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ─────────────────────────────────────────────
// Priority
// ─────────────────────────────────────────────

/// Alert priority as sent by the desktop application.
///
/// Stored and transmitted as upper-case text (`"LOW"`, `"HIGH"`, `"CRITICAL"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    Low,
    High,
    Critical,
}

impl Priority {
    /// Upper-case name used on the wire and in the `alerts` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }

    /// Parse a priority, case-insensitively.
    ///
    /// Anything that is not `HIGH` or `CRITICAL` is treated as `LOW`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Priority::Critical,
            "HIGH" => Priority::High,
            _ => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Priority::parse_lenient).unwrap_or_default())
    }
}

// ─────────────────────────────────────────────
// Incoming alert (relay payload)
// ─────────────────────────────────────────────

/// An alert as returned by `GET /alerts/{bot_id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingAlert {
    pub alert_type: String,
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
}

impl IncomingAlert {
    pub fn new(
        alert_type: impl Into<String>,
        message: impl Into<String>,
        priority: Priority,
    ) -> Self {
        IncomingAlert {
            alert_type: alert_type.into(),
            message: message.into(),
            priority,
        }
    }
}

// ─────────────────────────────────────────────
// Stored alert
// ─────────────────────────────────────────────

/// A row of the local alert log.
///
/// Rows are created on sync and never updated; the only mutation is the
/// password-gated bulk delete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Monotonic id assigned by the store.
    pub id: i64,
    pub alert_type: String,
    pub priority: Priority,
    pub message: String,
    /// Local receive time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub read: bool,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_known() {
        assert_eq!(Priority::parse_lenient("CRITICAL"), Priority::Critical);
        assert_eq!(Priority::parse_lenient("high"), Priority::High);
        assert_eq!(Priority::parse_lenient(" Low "), Priority::Low);
    }

    #[test]
    fn test_priority_parse_unknown_is_low() {
        assert_eq!(Priority::parse_lenient("MEDIUM"), Priority::Low);
        assert_eq!(Priority::parse_lenient(""), Priority::Low);
    }

    #[test]
    fn test_priority_serializes_upper_case() {
        let json = serde_json::to_string(&Priority::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }

    #[test]
    fn test_incoming_alert_from_relay_json() {
        let alert: IncomingAlert = serde_json::from_value(serde_json::json!({
            "alert_type": "Missed Dose",
            "message": "Metformin 500mg was not taken at 08:00",
            "priority": "high"
        }))
        .unwrap();

        assert_eq!(alert.alert_type, "Missed Dose");
        assert_eq!(alert.priority, Priority::High);
    }

    #[test]
    fn test_incoming_alert_missing_or_null_priority() {
        let missing: IncomingAlert = serde_json::from_value(serde_json::json!({
            "alert_type": "Refill",
            "message": "Two doses left"
        }))
        .unwrap();
        assert_eq!(missing.priority, Priority::Low);

        let null: IncomingAlert = serde_json::from_value(serde_json::json!({
            "alert_type": "Refill",
            "message": "Two doses left",
            "priority": null
        }))
        .unwrap();
        assert_eq!(null.priority, Priority::Low);
    }

    #[test]
    fn test_incoming_alert_requires_message() {
        let result: Result<IncomingAlert, _> = serde_json::from_value(serde_json::json!({
            "alert_type": "Refill"
        }));
        assert!(result.is_err());
    }
}
