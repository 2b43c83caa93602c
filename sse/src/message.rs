use crate::connection::{Connection, ConnectionId};
use tokio::sync::oneshot;

/// Requests serviced by the coordinating loop, one at a time and in the
/// order they were sent.
#[derive(Debug)]
pub enum Command {
    /// Add a connection to the registry
    Register(Connection),
    /// Remove a connection and close its delivery channel
    Deregister(ConnectionId),
    /// Deliver a text payload to every registered connection
    Broadcast(String),
    /// Report how many connections are registered
    Count(oneshot::Sender<usize>),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register(_) => "register",
            Command::Deregister(_) => "deregister",
            Command::Broadcast(_) => "broadcast",
            Command::Count(_) => "count",
        }
    }
}
