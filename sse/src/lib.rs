//! Server-Sent Events (SSE) client registry and broadcast fan-out.
//!
//! # Architecture
//!
//! - **Single owner**: the set of live connections is owned by one
//!   coordinating loop (`Coordinator`) running as its own task. Nothing else
//!   ever holds the map.
//! - **Command intake**: request handlers hold a cloneable `Manager` and
//!   send it `register`, `unregister` and `broadcast` requests. The loop
//!   applies them one at a time, so registry changes and broadcasts are
//!   totally ordered without locks.
//! - **Unbounded delivery**: each connection gets its own unbounded
//!   channel. A broadcast hands the payload to every channel and moves on;
//!   a slow or vanished consumer cannot stall the loop or anyone else. Its
//!   backlog is freed when it is deregistered.
//! - **Best effort**: no acknowledgements, no persistence. A client that is
//!   not connected when a broadcast is applied never sees it.
//!
//! # Message Flow
//!
//! 1. `GET /sse` calls `Manager::register_connection` with the peer address
//!    and keeps the returned `Subscription` inside the response stream.
//! 2. A publish call runs `Manager::broadcast(text)`.
//! 3. The loop pushes `text` into every registered connection's channel and
//!    each SSE response writes it as `data: <text>\n\n`.
//! 4. When the client goes away the response stream is dropped, the
//!    `Subscription` drop sends a deregister request, and the loop closes
//!    the channel.
//!
//! # Modules
//!
//! - `connection`: `Connection`, `ConnectionId` and the loop-owned registry
//! - `manager`: the `Manager` handle, the `Coordinator` loop and `Subscription`
//! - `message`: the commands the loop services

pub mod connection;
pub mod manager;
pub mod message;

pub use connection::{Connection, ConnectionId};
pub use manager::{Coordinator, Manager, Subscription};
