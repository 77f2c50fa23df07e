//! Connection registry and broadcaster.
//!
//! [`ConnectionRegistry`] tracks every live notification channel in
//! insertion order and fans text frames out to them. It is cheap to clone;
//! clones share the same backing list.
//!
//! # Concurrency
//!
//! The list sits behind a `std::sync::RwLock` so the close observer can
//! remove its entry synchronously from whatever thread the transport closes
//! on. [`ConnectionRegistry::send_to_all`] iterates a snapshot taken under
//! the read lock and releases the lock before sending, so a connection
//! closing mid-broadcast never invalidates the iteration and a re-entrant
//! close cannot deadlock.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::connection_id::ConnectionId;
use super::transport::{Transport, TransportState};
use crate::domain::{NotificationEvent, User};

/// A registered channel: its identity plus the transport it sends on.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Wraps a transport under a fresh [`ConnectionId`].
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            id: ConnectionId::new(),
            transport,
        }
    }

    /// Returns the connection's identity.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

type Connections = RwLock<Vec<Connection>>;

/// In-memory set of active connections with best-effort fan-out.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<Connections>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `connection` and arranges for it to be removed when its
    /// transport closes.
    ///
    /// Each connection must be added at most once.
    pub fn add_connection(&self, connection: Connection) {
        let id = connection.id;
        let transport = Arc::clone(&connection.transport);
        let total = {
            let mut list = self
                .connections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            list.push(connection);
            list.len()
        };
        tracing::info!(connection = %id, connections = total, "ws connection registered");

        let registry: Weak<Connections> = Arc::downgrade(&self.connections);
        transport.on_close(Box::new(move || {
            if let Some(connections) = registry.upgrade() {
                remove_connection(&connections, id);
            }
        }));
    }

    /// Returns a snapshot of the tracked connections in insertion order.
    #[must_use]
    pub fn active_connections(&self) -> Vec<Connection> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of tracked connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no connection is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sends `message` once to every connection whose transport is open.
    ///
    /// Closed connections are skipped. A failed send is logged and does not
    /// stop delivery to the rest. Returns how many sends were accepted.
    pub fn send_to_all(&self, message: &str) -> usize {
        let mut delivered = 0;
        for connection in self.active_connections() {
            if connection.transport.state() != TransportState::Open {
                continue;
            }
            match connection.transport.send(message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(connection = %connection.id, error = %e, "ws send failed");
                }
            }
        }
        delivered
    }

    /// Broadcasts a `userUpdated` event carrying the public projection of
    /// `user`. Returns how many connections accepted the frame.
    pub fn emit_user_update(&self, user: &User) -> usize {
        let event = NotificationEvent::user_updated(user);
        match serde_json::to_string(&event) {
            Ok(payload) => {
                let delivered = self.send_to_all(&payload);
                tracing::debug!(
                    event = event.event_name(),
                    user = %user.uuid,
                    delivered,
                    "notification broadcast"
                );
                delivered
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize notification");
                0
            }
        }
    }
}

fn remove_connection(connections: &Connections, id: ConnectionId) {
    let mut list = connections.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(pos) = list.iter().position(|c| c.id == id) {
        list.remove(pos);
        tracing::info!(connection = %id, connections = list.len(), "ws connection removed");
    }
}
