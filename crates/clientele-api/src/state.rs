//! Shared application state.

use clientele_core::ApiConfig;
use clientele_registry::ClientStore;
use std::sync::Arc;

/// State shared by every request. Holds no mutable data.
#[derive(Clone)]
pub struct AppState {
    /// Read-only client store.
    pub store: Arc<dyn ClientStore>,

    /// Endpoint settings.
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ClientStore>, config: ApiConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
