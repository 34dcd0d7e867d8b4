//! Caller identity extraction.
//!
//! Authentication happens in front of this service. The authenticating
//! proxy forwards the verified account email and granted scopes in headers
//! (names come from [`ApiConfig`](clientele_core::ApiConfig)); this module
//! only reads them.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Verified account email, the developer key.
    pub email: String,

    /// Granted scopes.
    pub scopes: Vec<String>,
}

impl Caller {
    /// Fails with [`ApiError::MissingScope`] unless `scope` was granted.
    pub fn require_scope(&self, scope: &str) -> Result<(), ApiError> {
        if self.scopes.iter().any(|granted| granted == scope) {
            Ok(())
        } else {
            Err(ApiError::MissingScope(scope.to_string()))
        }
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let email = header(state.config.identity_header.as_str());
        if email.is_empty() {
            return Err(ApiError::Unauthenticated);
        }

        let scopes = header(state.config.scope_header.as_str())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Ok(Caller { email, scopes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_scope() {
        let caller = Caller {
            email: "dev@example.com".to_string(),
            scopes: vec!["profile".to_string(), "oauth".to_string()],
        };
        assert!(caller.require_scope("oauth").is_ok());
        assert!(matches!(
            caller.require_scope("oauth:write"),
            Err(ApiError::MissingScope(_))
        ));
    }
}
