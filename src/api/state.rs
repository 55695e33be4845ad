//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Every workflow, behind its trait
    pub services: Arc<dyn ServiceContainer>,
    /// Database handle for health checks
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the production services over the database connection.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(database.get_connection(), config));
        Self { services, database }
    }

    /// State with injected services, e.g. mocks in router tests.
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self { services, database }
    }
}
