//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the SSE endpoint.
//! The registry and its coordinating loop live in the `sse` crate.

pub(crate) mod handler;
