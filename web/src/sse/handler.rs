use async_stream::stream;
use axum::extract::{ConnectInfo, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use log::*;
use service::AppState;
use std::convert::Infallible;
use std::net::SocketAddr;

/// Label used when the server was not started with connect info (e.g. in tests).
const UNKNOWN_PEER: &str = "unknown";

/// SSE handler that establishes a long-lived connection and streams every
/// broadcast message to it until the client goes away.
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> impl IntoResponse {
    let peer = connect_info
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| UNKNOWN_PEER.to_string());

    debug!("Establishing SSE connection for {peer}");

    // Registered before any header is written
    let mut subscription = app_state.sse_manager.register_connection(peer.clone());

    // The subscription lives inside the stream. When the client disconnects the
    // server drops the stream, and the subscription's drop deregisters it.
    let stream = stream! {
        while let Some(message) = subscription.recv().await {
            yield Ok::<Event, Infallible>(to_event(&message));
        }

        debug!("SSE connection for {peer} closed by the registry");
    };

    (
        [(header::CONNECTION, "keep-alive")],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
}

/// One `data:` event per message. Bare carriage returns are not allowed in an
/// SSE field, so they are dropped; line feeds become extra `data:` lines.
fn to_event(message: &str) -> Event {
    if message.contains('\r') {
        Event::default().data(message.replace('\r', ""))
    } else {
        Event::default().data(message)
    }
}
