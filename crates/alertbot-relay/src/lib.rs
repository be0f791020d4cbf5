//! Relay layer for Alertbot.
//!
//! # Architecture
//!
//! - [`client::AlertSource`] — trait for anything that can hand out pending alerts
//! - [`client::RelayClient`] — HTTP client for the relay server (`/register`, `/alerts/{bot_id}`)
//! - [`sync::AlertSyncLoop`] — fixed-interval poll that appends to the local log

pub mod client;
pub mod error;
pub mod sync;

pub use client::{AlertSource, RelayClient};
pub use error::RelayError;
pub use sync::{AlertSyncLoop, CycleOutcome, SyncContext, SyncState};
