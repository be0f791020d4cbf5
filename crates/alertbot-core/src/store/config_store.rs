//! Bot credentials persisted in the `config` table.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::database::Database;
use super::error::StoreError;

const KEY_BOT_ID: &str = "bot_id";
const KEY_API_KEY: &str = "api_key";
const KEY_ADMIN_PASSWORD: &str = "admin_password";

// ─────────────────────────────────────────────
// BotConfig
// ─────────────────────────────────────────────

/// The three settings written at setup and read at every startup.
#[derive(Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Identifier of this client on the relay server.
    pub bot_id: String,
    /// Key sent as `X-API-Key` when fetching alerts.
    pub api_key: String,
    /// Password guarding the clear-all action.
    pub admin_password: String,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_id", &self.bot_id)
            .field("api_key", &"<redacted>")
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

impl BotConfig {
    pub fn new(
        bot_id: impl Into<String>,
        api_key: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        BotConfig {
            bot_id: bot_id.into(),
            api_key: api_key.into(),
            admin_password: admin_password.into(),
        }
    }
}

// ─────────────────────────────────────────────
// ConfigStore
// ─────────────────────────────────────────────

/// Load/save access to the `config` table.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    db: Database,
}

impl ConfigStore {
    pub fn new(db: Database) -> Self {
        ConfigStore { db }
    }

    /// Load the stored config.
    ///
    /// Returns `None` unless all three keys are present and non-empty.
    pub fn load(&self) -> Result<Option<BotConfig>, StoreError> {
        let conn = self.db.connect()?;

        let bot_id = read_key(&conn, KEY_BOT_ID)?;
        let api_key = read_key(&conn, KEY_API_KEY)?;
        let admin_password = read_key(&conn, KEY_ADMIN_PASSWORD)?;

        match (bot_id, api_key, admin_password) {
            (Some(bot_id), Some(api_key), Some(admin_password)) => {
                debug!(bot_id = %bot_id, "loaded bot config");
                Ok(Some(BotConfig {
                    bot_id,
                    api_key,
                    admin_password,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Overwrite all three keys in a single transaction.
    pub fn save(&self, config: &BotConfig) -> Result<(), StoreError> {
        let mut conn = self.db.connect()?;
        let tx = conn.transaction()?;

        for (key, value) in [
            (KEY_BOT_ID, &config.bot_id),
            (KEY_API_KEY, &config.api_key),
            (KEY_ADMIN_PASSWORD, &config.admin_password),
        ] {
            tx.execute(
                "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }

        tx.commit()?;
        info!(bot_id = %config.bot_id, "bot config saved");
        Ok(())
    }

    /// Whether all three keys are present.
    pub fn is_configured(&self) -> Result<bool, StoreError> {
        Ok(self.load()?.is_some())
    }
}

fn read_key(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value: Option<Option<String>> = conn
        .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;

    Ok(value.flatten().filter(|v| !v.is_empty()))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
