use config::Config;
use sse::Manager;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sse_manager: Manager,
}

impl AppState {
    pub fn new(app_config: Config, sse_manager: Manager) -> Self {
        Self {
            config: app_config,
            sse_manager,
        }
    }
}
