//! # Client List Endpoint Tests
//!
//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use clientele_api::{create_router, AppState, ClientListResponse};
use clientele_core::ApiConfig;
use clientele_registry::{ClientRegistry, ClientStore, RegistryError, StoredClient};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const DEVELOPER: &str = "dev@example.com";

fn row(id: u8, name: &str, trusted: u8) -> StoredClient {
    StoredClient {
        id: vec![0xab, id],
        hashed_secret: vec![0x9f; 32],
        name: name.to_string(),
        image_uri: String::new(),
        redirect_uri: format!("https://{}.example/cb", name.to_lowercase()),
        terms_uri: String::new(),
        privacy_uri: String::new(),
        trusted,
        can_grant: 0,
        created_at: 1_400_000_000_000,
    }
}

fn app() -> Router {
    let registry = ClientRegistry::temporary().unwrap();
    registry
        .register_client(&row(0x01, "Sync", 1), Some(DEVELOPER))
        .unwrap();
    registry
        .register_client(&row(0x02, "Notes", 0), Some(DEVELOPER))
        .unwrap();
    registry
        .register_client(&row(0x03, "Elsewhere", 1), Some("other@example.com"))
        .unwrap();

    create_router(AppState::new(Arc::new(registry), ApiConfig::default()))
}

fn list_request(email: Option<&str>, scope: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/v1/clients");
    if let Some(email) = email {
        builder = builder.header("x-authenticated-email", email);
    }
    if let Some(scope) = scope {
        builder = builder.header("x-authenticated-scope", scope);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_lists_only_callers_clients() {
    let response = app()
        .oneshot(list_request(Some(DEVELOPER), Some("profile oauth")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ClientListResponse = serde_json::from_value(json_body(response).await).unwrap();
    let names: Vec<&str> = body.clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Sync", "Notes"]);
    assert_eq!(body.clients[0].id, "ab01");
}

#[tokio::test]
async fn test_whitelisted_mirrors_trusted() {
    let response = app()
        .oneshot(list_request(Some(DEVELOPER), Some("oauth")))
        .await
        .unwrap();
    let body = json_body(response).await;

    let sync = &body["clients"][0];
    assert_eq!(sync["trusted"], true);
    assert_eq!(sync["whitelisted"], true);
    let notes = &body["clients"][1];
    assert_eq!(notes["trusted"], false);
    assert_eq!(notes["whitelisted"], false);
}

#[tokio::test]
async fn test_optional_uris_always_present() {
    let response = app()
        .oneshot(list_request(Some(DEVELOPER), Some("oauth")))
        .await
        .unwrap();
    let body = json_body(response).await;

    for client in body["clients"].as_array().unwrap() {
        assert_eq!(client["terms_uri"], "");
        assert_eq!(client["privacy_uri"], "");
        assert!(client["redirect_uri"].is_string());
    }
}

#[tokio::test]
async fn test_unknown_developer_gets_empty_list() {
    let response = app()
        .oneshot(list_request(Some("nobody@example.com"), Some("oauth")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["clients"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let response = app()
        .oneshot(list_request(None, Some("oauth")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], 401);
}

#[tokio::test]
async fn test_missing_scope_is_forbidden() {
    let response = app()
        .oneshot(list_request(Some(DEVELOPER), Some("profile")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_store_failure_is_unavailable() {
    struct BrokenStore;

    impl ClientStore for BrokenStore {
        fn get_client(&self, _id: &[u8]) -> clientele_registry::Result<Option<StoredClient>> {
            Err(RegistryError::Corrupt("offline".to_string()))
        }

        fn clients_for_developer(
            &self,
            _email: &str,
        ) -> clientele_registry::Result<Vec<StoredClient>> {
            Err(RegistryError::Corrupt("offline".to_string()))
        }
    }

    let router = create_router(AppState::new(Arc::new(BrokenStore), ApiConfig::default()));
    let response = router
        .oneshot(list_request(Some(DEVELOPER), Some("oauth")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
