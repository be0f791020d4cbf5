//! Local SQLite store.
//!
//! One database file holds two tables:
//! - `config(key, value)` — the bot credentials, see [`ConfigStore`]
//! - `alerts(id, alert_type, priority, message, timestamp, read)` — the
//!   append-only alert log, see [`AlertLog`]
//!
//! Every operation opens its own connection, so a store handle is a cheap
//! `Clone` that can be moved into a blocking task.

pub mod alert_log;
pub mod config_store;
pub mod database;
pub mod error;

pub use alert_log::{AlertLog, RECENT_LIMIT};
pub use config_store::{BotConfig, ConfigStore};
pub use database::Database;
pub use error::StoreError;
