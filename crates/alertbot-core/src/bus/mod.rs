//! Event channel between the sync worker and the display side.
//!
//! The worker never touches display state; it publishes [`SyncEvent`]s and
//! the display task consumes them on its own schedule.

pub mod queue;
pub mod types;

pub use queue::EventBus;
pub use types::SyncEvent;
