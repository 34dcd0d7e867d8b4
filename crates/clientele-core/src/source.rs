//! Declarative source loading.
//!
//! The client list is read once per run from a JSON or YAML file; the format
//! is chosen by file extension. Each format keeps the list under its own
//! top-level key (see [`SourceConfig`]).

use crate::config::SourceConfig;
use crate::error::{ReconcileError, SchemaViolation};
use crate::policy::{value_text, RawClient};
use crate::Result;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Supported declarative file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl SourceFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(SourceFormat::Json),
            "yaml" | "yml" => Some(SourceFormat::Yaml),
            _ => None,
        }
    }

    /// The top-level key holding the client list for this format.
    pub fn list_key(self, config: &SourceConfig) -> &str {
        match self {
            SourceFormat::Json => config.json_key.as_str(),
            SourceFormat::Yaml => config.yaml_key.as_str(),
        }
    }
}

/// Loads the declarative client list from `path`.
///
/// # Returns
///
/// `Ok(None)` when the file has an unsupported extension or carries no
/// client list; such a run is a no-op.
///
/// # Errors
///
/// - `ReconcileError::Source` if the file cannot be read or parsed.
/// - `ReconcileError::SchemaViolation` if the list or an entry has the wrong shape.
pub fn load_declared_clients(path: &Path, config: &SourceConfig) -> Result<Option<Vec<RawClient>>> {
    let Some(format) = SourceFormat::from_path(path) else {
        warn!(path = %path.display(), "unsupported declarative source extension, nothing to check");
        return Ok(None);
    };

    let content = fs::read_to_string(path)
        .map_err(|e| ReconcileError::Source(format!("{}: {}", path.display(), e)))?;

    let document: Value = match format {
        SourceFormat::Json => serde_json::from_str(&content)
            .map_err(|e| ReconcileError::Source(format!("{}: {}", path.display(), e)))?,
        SourceFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| ReconcileError::Source(format!("{}: {}", path.display(), e)))?,
    };

    debug!(path = %path.display(), format = ?format, "declarative source parsed");
    parse_client_list(&document, format.list_key(config))
}

/// Extracts the client list stored under `key` in a parsed document.
pub fn parse_client_list(document: &Value, key: &str) -> Result<Option<Vec<RawClient>>> {
    let list = match document.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(list)) => list,
        Some(_) => {
            return Err(SchemaViolation::Malformed {
                key: key.to_string(),
                name: "unknown".to_string(),
                reason: "client list must be a sequence".to_string(),
            }
            .into())
        }
    };

    list.iter()
        .enumerate()
        .map(|(index, entry)| -> Result<RawClient> {
            match entry {
                Value::Object(client) => Ok(client.clone()),
                other => Err(SchemaViolation::Malformed {
                    key: format!("{}[{}]", key, index),
                    name: value_text(other),
                    reason: "client entry must be a mapping".to_string(),
                }
                .into()),
            }
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
