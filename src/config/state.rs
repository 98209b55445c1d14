// Application state module
// Immutable runtime state shared by the accept loop and every connection task

use super::types::Config;
use crate::handler::HandlerContext;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Settings handed to each connection handler
    pub handler: HandlerContext,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            handler: HandlerContext::from_config(config),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn access_log_format(&self) -> &str {
        &self.config.logging.access_log_format
    }
}
