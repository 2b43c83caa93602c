use log::*;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One live SSE subscriber.
///
/// `peer` is the remote address the request came from. It is only a label:
/// two connections from the same address are still two connections, told
/// apart by their `id`.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    peer: String,
    sender: UnboundedSender<String>,
}

impl Connection {
    /// Create a connection together with the receiving half of its delivery channel.
    pub fn new(peer: impl Into<String>) -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            id: ConnectionId::new(),
            peer: peer.into(),
            sender,
        };
        (connection, receiver)
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

/// The set of registered connections. Owned by the coordinating loop and
/// never shared, so it needs no locking.
#[derive(Debug, Default)]
pub(crate) struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    pub(crate) fn register(&mut self, connection: Connection) {
        debug!(
            "Registering connection {} from {}",
            connection.id, connection.peer
        );
        self.connections.insert(connection.id.clone(), connection);
    }

    /// Removing a connection drops its sender, which closes the delivery channel.
    /// Unknown ids are ignored.
    pub(crate) fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Connection> {
        let removed = self.connections.remove(connection_id);
        match &removed {
            Some(connection) => debug!(
                "Unregistered connection {} from {}",
                connection.id, connection.peer
            ),
            None => trace!("Ignoring unregister for unknown connection {connection_id}"),
        }
        removed
    }

    /// Hand `message` to every registered connection's channel. Delivery never
    /// waits on a consumer: the channels are unbounded, and a send to a
    /// receiver that is already gone is logged and skipped.
    pub(crate) fn broadcast(&self, message: &str) -> usize {
        let mut delivered = 0;
        for (connection_id, connection) in self.connections.iter() {
            match connection.sender.send(message.to_owned()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    "Failed to send broadcast to connection {}: {}. Connection will be cleaned up.",
                    connection_id, e
                ),
            }
        }
        delivered
    }

    pub(crate) fn len(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_from_same_peer_get_distinct_ids() {
        let (first, _rx1) = Connection::new("127.0.0.1:5000");
        let (second, _rx2) = Connection::new("127.0.0.1:5000");

        assert_eq!(first.peer(), second.peer());
        assert_ne!(first.id(), second.id());

        let mut registry = ConnectionRegistry::new();
        registry.register(first);
        registry.register(second);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_broadcast_reaches_every_registered_connection() {
        let mut registry = ConnectionRegistry::new();
        let (first, mut rx1) = Connection::new("a");
        let (second, mut rx2) = Connection::new("b");
        registry.register(first);
        registry.register(second);

        assert_eq!(registry.broadcast("hello"), 2);
        assert_eq!(rx1.try_recv().unwrap(), "hello");
        assert_eq!(rx2.try_recv().unwrap(), "hello");
        assert!(rx1.try_recv().is_err());
    }

    #[test]
    fn test_unregister_closes_the_delivery_channel() {
        let mut registry = ConnectionRegistry::new();
        let (connection, mut rx) = Connection::new("a");
        let id = connection.id().clone();
        registry.register(connection);

        let removed = registry.unregister(&id);
        drop(removed);

        assert_eq!(registry.len(), 0);
        assert_eq!(
            rx.try_recv(),
            Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
        );
    }

    #[test]
    fn test_unregister_unknown_connection_is_a_noop() {
        let mut registry = ConnectionRegistry::new();
        let (connection, mut rx) = Connection::new("a");
        registry.register(connection);

        assert!(registry.unregister(&ConnectionId::new()).is_none());
        assert_eq!(registry.len(), 1);

        registry.broadcast("still here");
        assert_eq!(rx.try_recv().unwrap(), "still here");
    }

    #[test]
    fn test_broadcast_skips_connections_whose_receiver_is_gone() {
        let mut registry = ConnectionRegistry::new();
        let (gone, rx_gone) = Connection::new("gone");
        let (alive, mut rx_alive) = Connection::new("alive");
        registry.register(gone);
        registry.register(alive);
        drop(rx_gone);

        assert_eq!(registry.broadcast("ping"), 1);
        assert_eq!(rx_alive.try_recv().unwrap(), "ping");
    }
}
