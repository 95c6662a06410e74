use shared_config::AppConfig;
use shared_store::Store;

/// Shared application state handed to every router.
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Self {
        Self { config, store }
    }
}
