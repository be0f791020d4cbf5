//! Application settings — schema, loading, and env var overrides.
//!
//! These are the client's own settings (relay server, poll interval, database
//! location). The bot credentials live in the database, see
//! [`crate::store::ConfigStore`].
//!
//! # Usage
//! ```no_run
//! use alertbot_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Relay: {}", cfg.relay.server_url);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{get_config_path, load_config, save_config};
pub use schema::{Config, RelayConfig, StorageConfig};
