//! Application state shared by all handlers.

use pixform_core::ServiceConfig;
use pixform_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: ServiceConfig,
    /// Upload directory; the only state shared between requests.
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: ServiceConfig, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }
}
