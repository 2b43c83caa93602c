use log::*;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub use self::error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
pub(crate) mod params;
pub mod router;
mod sse;

/// Bind the configured address and serve the API until the process is stopped.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let listen_addr = app_state.config.listen_address();
    let listener = TcpListener::bind(&listen_addr).await?;

    info!("Server starting... listening for connections on http://{listen_addr}");

    // Peer addresses label SSE connections, so the service must carry connect info
    axum::serve(
        listener,
        router::define_routes(app_state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
