//! Application state shared across handlers

use crate::config::Settings;
use crate::dispatch::{Dispatcher, Scanner};
use crate::network::HttpClient;
use crate::providers::ProviderRegistry;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Single-call search and analysis
    pub dispatcher: Arc<Dispatcher>,
    /// Search-then-analyze flow
    pub scanner: Arc<Scanner>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, registry: ProviderRegistry, client: HttpClient) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            client,
            Arc::new(registry),
            settings.analysis.instruction.clone(),
        ));
        let scanner = Arc::new(Scanner::new(
            dispatcher.clone(),
            settings.scan.clone(),
            settings.templates.clone(),
        ));

        Self {
            settings: Arc::new(settings),
            dispatcher,
            scanner,
        }
    }
}
