//! Process-wide ordering of connection events.

use tokio::sync::{Mutex, MutexGuard};

/// Serializes connection events so that each one runs to completion.
///
/// Connect, every relayed message and disconnect hold the guard across
/// validate → registry mutation → fanout. Fanout only enqueues onto
/// per-connection channels, so no socket I/O happens while it is held.
#[derive(Debug, Default)]
pub struct EventSequencer {
    lock: Mutex<()>,
}

impl EventSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the previous event to finish and start the next one
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
