//! Bounded event bus on top of `tokio::sync::mpsc`.

use super::types::SyncEvent;
use tokio::sync::mpsc;

/// Default number of events buffered before the worker waits on the display.
pub const DEFAULT_BUFFER: usize = 32;

/// The event bus connecting the sync worker to the display task.
///
/// - The worker publishes through a cloned [`mpsc::Sender`]
/// - The display side consumes with [`EventBus::consume`]
pub struct EventBus {
    tx: mpsc::Sender<SyncEvent>,
    rx: tokio::sync::Mutex<mpsc::Receiver<SyncEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);

        EventBus {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    /// Consume the next event (waits until one is available).
    /// Returns None if all senders are dropped.
    pub async fn consume(&self) -> Option<SyncEvent> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Take every event that is already queued without waiting.
    pub async fn drain(&self) -> Vec<SyncEvent> {
        let mut rx = self.rx.lock().await;
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Get a clone of the sender (for the sync worker).
    pub fn sender(&self) -> mpsc::Sender<SyncEvent> {
        self.tx.clone()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER)
    }
}
