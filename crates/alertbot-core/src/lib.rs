//! Alertbot core — shared building blocks for the relay worker and the CLI.
//!
//! - [`types`] — alert and priority types
//! - [`store`] — SQLite-backed config store and append-only alert log
//! - [`config`] — application settings file + env overrides
//! - [`bus`] — event channel between the sync worker and the display side
//! - [`utils`] — paths and timestamps

pub mod bus;
pub mod config;
pub mod store;
pub mod types;
pub mod utils;

pub use store::{AlertLog, BotConfig, ConfigStore, Database, StoreError, RECENT_LIMIT};
pub use types::{Alert, IncomingAlert, Priority};
