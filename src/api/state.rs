//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Config;
use crate::integrations::{IssueTracker, JiraClient, OllamaClient, TicketGenerator};

/// Shared application state
///
/// Holds no per-request data; every handler only reads from it.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TicketGenerator>,
    pub tracker: Arc<dyn IssueTracker>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the real Ollama and JIRA clients from `config`
    pub fn new(config: Config) -> Self {
        let generator = Arc::new(OllamaClient::from_config(&config.ollama));
        let tracker = Arc::new(JiraClient::from_config(&config.jira));
        Self::with_services(config, generator, tracker)
    }

    pub fn with_services(
        config: Config,
        generator: Arc<dyn TicketGenerator>,
        tracker: Arc<dyn IssueTracker>,
    ) -> Self {
        Self {
            generator,
            tracker,
            config: Arc::new(config),
        }
    }
}
