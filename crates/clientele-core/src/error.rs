//! Error types for reconciliation.

use crate::config::ConfigError;
use clientele_registry::RegistryError;
use thiserror::Error;

/// A declarative record that cannot be processed as written.
#[derive(Debug, Error)]
pub enum SchemaViolation {
    /// A required key is absent.
    #[error("client '{name}' is missing required key '{key}'")]
    MissingField {
        /// The missing declarative key.
        key: &'static str,
        /// The client's name, or `unknown`.
        name: String,
    },

    /// A key is present but its value is unusable.
    #[error("client '{name}' has malformed '{key}': {reason}")]
    Malformed {
        /// The offending key or list position.
        key: String,
        /// The client's name, or `unknown`.
        name: String,
        /// What is wrong with the value.
        reason: String,
    },
}

/// Fatal reconciliation errors. Any of these aborts the whole run.
///
/// A client missing from the store or differing from it is an outcome,
/// not an error; see [`crate::OutcomeKind`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A declarative record carries a plaintext secret.
    #[error(
        "Do not keep client secrets in the config file. Use the `hashedSecret` field instead: \
         client={client_id} has `secret` field, use hashedSecret=\"{hashed_secret}\" instead"
    )]
    PolicyViolation {
        /// Identifier of the offending client, or `unknown`.
        client_id: String,
        /// The digest the operator should put in `hashedSecret`.
        hashed_secret: String,
    },

    /// A declarative record is missing a required key or is malformed.
    #[error("Schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    /// The store could not be opened or queried.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The declarative source could not be read or parsed.
    #[error("Declarative source error: {0}")]
    Source(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<RegistryError> for ReconcileError {
    fn from(err: RegistryError) -> Self {
        ReconcileError::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_violation_message_carries_remediation() {
        let err = ReconcileError::PolicyViolation {
            client_id: "ab12".to_string(),
            hashed_secret: "ba7816bf".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("client=ab12"));
        assert!(message.contains("hashedSecret=\"ba7816bf\""));
    }

    #[test]
    fn test_config_error_converts() {
        let err: ReconcileError = ConfigError::Invalid("bad".to_string()).into();
        assert!(matches!(err, ReconcileError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration: bad"
        );
    }

    #[test]
    fn test_missing_field_message() {
        let err: ReconcileError = SchemaViolation::MissingField {
            key: "redirectUri",
            name: "unknown".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Schema violation: client 'unknown' is missing required key 'redirectUri'"
        );
    }
}
