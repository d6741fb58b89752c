//! Outbound side of the client connection.
//!
//! The presentation layer sends every edit through
//! [`ClientConnection::send_update`], which quietly does nothing while the
//! client is not connected.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chalkboard_shared::protocol::{SocketMessage, encode};
use tokio::sync::mpsc;

/// Connectivity as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Socket opening or waiting for INITIAL_STATE
    Connecting,
    /// INITIAL_STATE received; edits are shared
    Connected,
    /// No server; edits stay local
    Local,
}

struct Inner {
    status: ConnectionStatus,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

/// Cloneable handle to the current connection
#[derive(Clone)]
pub struct ClientConnection {
    inner: Arc<Mutex<Inner>>,
}

impl ClientConnection {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                status: ConnectionStatus::Local,
                outbound: None,
            })),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.lock().status
    }

    /// Send a message to the room.
    ///
    /// Returns `false` without sending when not connected.
    pub fn send_update(&self, message: &SocketMessage) -> bool {
        let inner = self.lock();
        let sender = match (&inner.status, &inner.outbound) {
            (ConnectionStatus::Connected, Some(sender)) => sender,
            _ => {
                tracing::debug!("Not connected, {} kept local", message.kind());
                return false;
            }
        };

        let json = match encode(message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode {}: {}", message.kind(), e);
                return false;
            }
        };
        sender.send(json).is_ok()
    }

    /// A new socket is being opened; frames go to `outbound` once connected
    pub(crate) fn attach(&self, outbound: mpsc::UnboundedSender<String>) {
        let mut inner = self.lock();
        inner.status = ConnectionStatus::Connecting;
        inner.outbound = Some(outbound);
    }

    pub(crate) fn mark_connected(&self) {
        let mut inner = self.lock();
        if inner.outbound.is_some() {
            inner.status = ConnectionStatus::Connected;
        }
    }

    /// The socket is gone; fall back to local-only mode
    pub(crate) fn detach(&self) {
        let mut inner = self.lock();
        inner.status = ConnectionStatus::Local;
        inner.outbound = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ClientConnection {
    fn default() -> Self {
        Self::new()
    }
}
