//! Request handlers.

use crate::caller::Caller;
use crate::error::ApiError;
use crate::serialize::ClientListResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

/// `GET /v1/clients`: the clients registered to the caller's account.
pub async fn list_clients(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ClientListResponse>, ApiError> {
    caller.require_scope(&state.config.client_management_scope)?;

    let store = Arc::clone(&state.store);
    let email = caller.email.clone();
    let clients = tokio::task::spawn_blocking(move || store.clients_for_developer(&email))
        .await
        .map_err(|e| ApiError::StoreUnavailable(e.to_string()))?
        .map_err(|e| {
            error!(developer = %caller.email, error = %e, "client list query failed");
            ApiError::from(e)
        })?;

    debug!(developer = %caller.email, count = clients.len(), "clients listed");
    Ok(Json(ClientListResponse::from(clients)))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
