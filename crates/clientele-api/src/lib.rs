//! # Clientele API - Client List Endpoint
//!
//! Serves the OAuth clients registered to a developer account.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth | Response |
//! |--------|------|------|----------|
//! | GET | `/v1/clients` | caller identity + client management scope | `{ "clients": [...] }` |
//! | GET | `/health` | none | `{ "status": "ok" }` |
//!
//! Caller identity is established upstream; see [`caller`]. Each request
//! makes exactly one store query, run on the blocking pool.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let state = AppState::new(Arc::new(config.store.open()?), config.api.clone());
//! clientele_api::serve(state, &config.api.bind_addr).await?;
//! ```

pub mod caller;
mod error;
pub mod handlers;
pub mod serialize;
mod state;

pub use caller::Caller;
pub use error::ApiError;
pub use serialize::{serialize_client, ClientListResponse, ClientView};
pub use state::AppState;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/clients", get(handlers::list_clients))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_addr` and serves until Ctrl-C.
pub async fn serve(state: AppState, bind_addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "client list endpoint listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}
