use log::*;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    info!(
        "Starting fakeit server in {} mode on {}",
        config.runtime_env(),
        config.listen_address()
    );

    if config.openai_api_key().is_none() {
        warn!("OPENAI_API_KEY is not set, /publish requests will fail until it is");
    }

    // The coordinating loop owns the SSE registry for the life of the process
    let sse_manager = sse::Manager::spawn();
    let app_state = AppState::new(config, sse_manager);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped with error: {e}");
        std::process::exit(1);
    }
}
