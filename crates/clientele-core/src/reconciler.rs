//! The reconciliation run.
//!
//! A run takes the declarative client list and, for each client:
//!
//! ```text
//! guarding-secret → validating → fetching → canonicalizing → comparing
//!                                                               │
//!                                      ┌────────────┬───────────┴──┐
//!                                      ▼            ▼              ▼
//!                                    equal       differs   missing-in-store
//! ```
//!
//! Guarding and validation happen for the whole list before the first
//! lookup is issued. A fatal error in any record returns `Err` and no lookup
//! is made. Lookups are independent and run concurrently on the blocking
//! pool; the run finishes once every lookup has resolved. A store failure
//! aborts the lookups still in flight.

use crate::config::ReconcileConfig;
use crate::error::ReconcileError;
use crate::policy::{guard_secret, validate_required, DeclaredClient, RawClient};
use crate::report::{ClientOutcome, OutcomeKind, ReconcileReport};
use crate::Result;
use clientele_registry::canonicalize::canonicalize;
use clientele_registry::compare::compare_clients;
use clientele_registry::{ClientStore, Comparison, SecretHasher, Sha256Hasher, StoredClient};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Compares a declarative client list against the client store.
///
/// The reconciler never writes to the store.
///
/// # Example
///
/// ```rust,ignore
/// let registry = Arc::new(config.store.open()?);
/// let reconciler = Reconciler::new(config.reconcile.clone(), registry);
///
/// let report = reconciler.run(&clients).await?;
/// println!("{}", report);
/// ```
pub struct Reconciler {
    /// Run settings.
    config: ReconcileConfig,

    /// Shared read-only store handle.
    store: Arc<dyn ClientStore>,

    /// Digest used for secret policy remediation.
    hasher: Arc<dyn SecretHasher>,
}

impl Reconciler {
    /// Creates a reconciler using SHA-256 secret hashing.
    pub fn new(config: ReconcileConfig, store: Arc<dyn ClientStore>) -> Self {
        Self {
            config,
            store,
            hasher: Arc::new(Sha256Hasher),
        }
    }

    /// Replaces the secret hasher.
    pub fn with_hasher(mut self, hasher: Arc<dyn SecretHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Guards and validates every declarative client.
    ///
    /// Stops at the first fatal record.
    pub fn prepare(&self, clients: &[RawClient]) -> Result<Vec<DeclaredClient>> {
        clients
            .iter()
            .map(|raw| {
                guard_secret(raw, self.hasher.as_ref())?;
                validate_required(raw)
            })
            .collect()
    }

    /// Runs reconciliation over the declarative client list.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::PolicyViolation` if any record carries a plaintext secret.
    /// - `ReconcileError::SchemaViolation` if any record is missing a required key.
    /// - `ReconcileError::StoreUnavailable` if any lookup fails.
    ///
    /// Clients that differ from or are missing in the store are reported in
    /// the returned [`ReconcileReport`], not as errors.
    pub async fn run(&self, clients: &[RawClient]) -> Result<ReconcileReport> {
        if clients.is_empty() {
            info!("No predefined clients to check");
            return Ok(ReconcileReport::default());
        }

        debug!(count = clients.len(), "predefined.loading");
        let declared = self.prepare(clients)?;
        let total = declared.len();

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_lookups.max(1)));
        let mut lookups = JoinSet::new();

        for (index, client) in declared.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let permits = Arc::clone(&permits);
            lookups.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| ReconcileError::StoreUnavailable(e.to_string()))?;
                let key = client.lookup_key.clone();
                let row = tokio::task::spawn_blocking(move || store.get_client(&key))
                    .await
                    .map_err(|e| {
                        ReconcileError::StoreUnavailable(format!("lookup task failed: {}", e))
                    })??;
                Ok::<_, ReconcileError>((index, classify(client, row)))
            });
        }

        let mut outcomes: Vec<Option<ClientOutcome>> = vec![None; total];
        while let Some(joined) = lookups.join_next().await {
            let (index, outcome) = joined
                .map_err(|e| ReconcileError::StoreUnavailable(format!("lookup task failed: {}", e)))??;
            outcomes[index] = Some(outcome);
        }

        Ok(ReconcileReport {
            outcomes: outcomes.into_iter().flatten().collect(),
        })
    }
}

/// Canonicalizes the stored row, compares it, and logs the outcome.
fn classify(client: DeclaredClient, row: Option<StoredClient>) -> ClientOutcome {
    let client_id = client.record.id.clone();
    debug!(client_id = %client_id, "client.compare");

    let kind = match row {
        None => {
            info!(client_id = %client_id, "client.compare.missing");
            OutcomeKind::MissingInStore
        }
        Some(row) => {
            let stored = canonicalize(&row);
            match compare_clients(&client.record, &stored) {
                Comparison::Equal => {
                    info!(client_id = %client_id, "client.compare.equal");
                    OutcomeKind::Equal
                }
                Comparison::Differs(diffs) => {
                    for diff in &diffs {
                        warn!(
                            client_id = %client_id,
                            field = %diff.field,
                            declared = %diff.declared,
                            stored = diff.stored.as_deref().unwrap_or("<unset>"),
                            "client.compare.differs"
                        );
                    }
                    debug!(client_id = %client_id, before = ?stored, after = ?client.record, "client.compare.records");
                    OutcomeKind::Differs { diffs }
                }
            }
        }
    };

    ClientOutcome { client_id, kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientele_registry::ClientRegistry;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawClient {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn reconciler(registry: ClientRegistry) -> Reconciler {
        Reconciler::new(ReconcileConfig::default(), Arc::new(registry))
    }

    #[tokio::test]
    async fn test_empty_list_is_noop() {
        let report = reconciler(ClientRegistry::temporary().unwrap())
            .run(&[])
            .await
            .unwrap();
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_client_is_missing() {
        let client = raw(json!({
            "id": "ab12", "hashedSecret": "00", "name": "App", "imageUri": "",
            "redirectUri": "", "trusted": false, "canGrant": false
        }));

        let report = reconciler(ClientRegistry::temporary().unwrap())
            .run(&[client])
            .await
            .unwrap();
        assert_eq!(report.outcomes[0].kind, OutcomeKind::MissingInStore);
        assert_eq!(report.outcomes[0].client_id, "ab12");
    }

    #[test]
    fn test_prepare_stops_at_secret() {
        let clients = vec![
            raw(json!({ "id": "01", "secret": "abc" })),
            raw(json!({ "id": "02" })),
        ];
        let err = reconciler(ClientRegistry::temporary().unwrap())
            .prepare(&clients)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::PolicyViolation { .. }));
    }
}
