//! Settings schema.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default relay server.
pub const DEFAULT_SERVER_URL: &str = "https://curax-alerts.herokuapp.com";

/// Default delay between two polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default per-request HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root settings — loaded from `~/.alertbot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub relay: RelayConfig,
    pub storage: StorageConfig,
}

// ─────────────────────────────────────────────
// Relay
// ─────────────────────────────────────────────

/// Relay server connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    /// Base URL of the relay server (no trailing `/register` etc.).
    pub server_url: String,
    /// Seconds to sleep between two polls.
    pub poll_interval_secs: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RelayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ─────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────

/// Local database settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Path of the SQLite database. `~` is expanded.
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "~/.alertbot/alerts.db".to_string(),
        }
    }
}

impl StorageConfig {
    /// Database path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        crate::utils::expand_home(&self.database_path)
    }
}
