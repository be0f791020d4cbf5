//! Settings loader — reads `~/.alertbot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.alertbot/config.json`
//! 3. Environment variables `ALERTBOT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default settings file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load settings from the given path (or the default one) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load settings from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save settings to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of loaded settings.
///
/// Supported overrides:
/// - `ALERTBOT_RELAY__SERVER_URL` → `relay.server_url`
/// - `ALERTBOT_RELAY__POLL_INTERVAL_SECS` → `relay.poll_interval_secs`
/// - `ALERTBOT_RELAY__TIMEOUT_SECS` → `relay.timeout_secs`
/// - `ALERTBOT_STORAGE__DATABASE_PATH` → `storage.database_path`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("ALERTBOT_RELAY__SERVER_URL") {
        config.relay.server_url = val;
    }
    if let Ok(val) = std::env::var("ALERTBOT_RELAY__POLL_INTERVAL_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.relay.poll_interval_secs = n,
            Err(_) => warn!(value = %val, "ignoring invalid ALERTBOT_RELAY__POLL_INTERVAL_SECS"),
        }
    }
    if let Ok(val) = std::env::var("ALERTBOT_RELAY__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.relay.timeout_secs = n,
            Err(_) => warn!(value = %val, "ignoring invalid ALERTBOT_RELAY__TIMEOUT_SECS"),
        }
    }
    if let Ok(val) = std::env::var("ALERTBOT_STORAGE__DATABASE_PATH") {
        config.storage.database_path = val;
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
