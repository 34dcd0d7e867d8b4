//! Configuration types for Clientele.
//!
//! Configuration is an explicit value handed to the reconciler and the API
//! at construction. Nothing reads process-global state.

use clientele_registry::{ClientRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClienteleConfig {
    /// Client store selection.
    pub store: StoreConfig,

    /// Declarative source layout.
    pub source: SourceConfig,

    /// Reconciliation run settings.
    pub reconcile: ReconcileConfig,

    /// Read endpoint settings.
    pub api: ApiConfig,
}

/// Which store backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// On-disk Sled database at `db_path`.
    Sled,
    /// In-memory Sled database, discarded on exit.
    Temporary,
}

/// Client store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to open.
    pub backend: StoreBackend,

    /// Path to the registry database.
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sled,
            db_path: PathBuf::from("./clientele.db"),
        }
    }
}

impl StoreConfig {
    /// Opens the configured store.
    pub fn open(&self) -> Result<ClientRegistry, RegistryError> {
        match self.backend {
            StoreBackend::Sled => ClientRegistry::new(&self.db_path),
            StoreBackend::Temporary => ClientRegistry::temporary(),
        }
    }
}

/// Where the client list lives inside a declarative source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Top-level key holding the list in `.json` files.
    pub json_key: String,

    /// Top-level key holding the list in `.yaml` / `.yml` files.
    pub yaml_key: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            json_key: "clients".to_string(),
            yaml_key: "fxa_oauth::clients".to_string(),
        }
    }
}

/// Reconciliation run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Upper bound on store lookups in flight at once.
    pub max_concurrent_lookups: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: 16,
        }
    }
}

/// Read endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Scope a caller must hold to list clients.
    pub client_management_scope: String,

    /// Header carrying the caller's verified account email.
    pub identity_header: String,

    /// Header carrying the caller's space-separated scopes.
    pub scope_header: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9010".to_string(),
            client_management_scope: "oauth".to_string(),
            identity_header: "x-authenticated-email".to_string(),
            scope_header: "x-authenticated-scope".to_string(),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ClienteleConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content and validate it.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconcile.max_concurrent_lookups == 0 {
            return Err(ConfigError::Invalid(
                "reconcile.max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        if self.api.client_management_scope.is_empty() {
            return Err(ConfigError::Invalid(
                "api.client_management_scope must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
