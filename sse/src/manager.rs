use crate::connection::{Connection, ConnectionId, ConnectionRegistry};
use crate::message::Command;
use log::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

/// Cloneable handle used by request handlers to talk to the coordinating loop.
///
/// The handle never touches the registry itself. Every call becomes a
/// `Command` on the loop's intake, so registrations, removals and
/// broadcasts are applied in a single total order.
#[derive(Debug, Clone)]
pub struct Manager {
    intake: UnboundedSender<Command>,
}

impl Manager {
    /// Create a handle and the loop it feeds. The loop does nothing until
    /// `Coordinator::run` is awaited.
    pub fn new() -> (Self, Coordinator) {
        let (intake, commands) = mpsc::unbounded_channel();
        (
            Self { intake },
            Coordinator {
                commands,
                registry: ConnectionRegistry::new(),
            },
        )
    }

    /// Create a handle and spawn its loop on the current tokio runtime.
    pub fn spawn() -> Self {
        let (manager, coordinator) = Self::new();
        tokio::spawn(coordinator.run());
        manager
    }

    /// Register a new connection for `peer` and return the subscription that
    /// receives its messages. Dropping the subscription deregisters it.
    pub fn register_connection(&self, peer: impl Into<String>) -> Subscription {
        let (connection, receiver) = Connection::new(peer);
        let connection_id = connection.id().clone();
        info!(
            "Registering new SSE connection {} from {}",
            connection_id,
            connection.peer()
        );
        self.send(Command::Register(connection));

        Subscription {
            connection_id,
            receiver,
            manager: self.clone(),
        }
    }

    /// Unregister a connection by ID. Unknown IDs are ignored by the loop.
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        info!("Unregistering SSE connection {connection_id}");
        self.send(Command::Deregister(connection_id.clone()));
    }

    /// Send `message` to every connection registered when the loop gets to it
    pub fn broadcast(&self, message: impl Into<String>) {
        self.send(Command::Broadcast(message.into()));
    }

    /// Number of registered connections, as seen after every command sent
    /// before this call has been applied.
    pub async fn connection_count(&self) -> usize {
        let (reply, response) = oneshot::channel();
        self.send(Command::Count(reply));
        response.await.unwrap_or_default()
    }

    fn send(&self, command: Command) {
        let name = command.name();
        if self.intake.send(command).is_err() {
            warn!("SSE coordinating loop has stopped, dropping {name} request");
        }
    }
}

/// The coordinating loop. Owns the registry for the life of the process.
#[derive(Debug)]
pub struct Coordinator {
    commands: UnboundedReceiver<Command>,
    registry: ConnectionRegistry,
}

impl Coordinator {
    /// Service commands until every `Manager` handle has been dropped.
    pub async fn run(mut self) {
        debug!("SSE coordinating loop started");

        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }

        debug!(
            "SSE coordinating loop stopped with {} connection(s) still registered",
            self.registry.len()
        );
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Register(connection) => {
                self.registry.register(connection);
            }
            Command::Deregister(connection_id) => {
                self.registry.unregister(&connection_id);
            }
            Command::Broadcast(message) => {
                let delivered = self.registry.broadcast(&message);
                debug!(
                    "Broadcast delivered to {delivered} of {} connection(s)",
                    self.registry.len()
                );
            }
            Command::Count(reply) => {
                // The caller may have given up waiting
                let _ = reply.send(self.registry.len());
            }
        }
    }
}

/// The receiving side of one registered connection.
#[derive(Debug)]
pub struct Subscription {
    connection_id: ConnectionId,
    receiver: UnboundedReceiver<String>,
    manager: Manager,
}

impl Subscription {
    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Wait for the next message. Returns `None` once the connection has been
    /// deregistered and every queued message has been read.
    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The intake is unbounded so this never blocks, even during shutdown
        self.manager.unregister_connection(&self.connection_id);
    }
}
