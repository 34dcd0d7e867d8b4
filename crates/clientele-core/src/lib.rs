//! # Clientele Core - Client List Reconciliation
//!
//! Compares an operator-authored, declarative list of OAuth clients against
//! the client registry and reports, per client, whether the two agree.
//! Neither side is ever modified.
//!
//! ## Outcomes and Failures
//!
//! | Situation | Kind | Effect on run |
//! |-----------|------|---------------|
//! | Plaintext `secret` in a record | [`ReconcileError::PolicyViolation`] | Fatal, prints the digest to use instead |
//! | Required key missing | [`ReconcileError::SchemaViolation`] | Fatal, names the key and the client |
//! | Store cannot be queried | [`ReconcileError::StoreUnavailable`] | Fatal, no retry |
//! | Client not in the store | [`OutcomeKind::MissingInStore`] | Reported, run continues |
//! | Fields differ | [`OutcomeKind::Differs`] | Reported, run continues |
//! | Fields agree | [`OutcomeKind::Equal`] | Reported, run continues |
//!
//! Any fatal record stops the whole run; it is never skipped.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       RECONCILER                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  source file ──▶ RawClient list                                 │
//! │                       │                                         │
//! │                       ▼                                         │
//! │            ┌─────────────────────┐                              │
//! │            │ Secret Policy Guard │──▶ PolicyViolation (abort)   │
//! │            └──────────┬──────────┘                              │
//! │                       ▼                                         │
//! │            ┌─────────────────────┐                              │
//! │            │ Required-Field      │──▶ SchemaViolation (abort)   │
//! │            │ Validator           │                              │
//! │            └──────────┬──────────┘                              │
//! │                       ▼  (all records)                          │
//! │            ┌─────────────────────┐      ┌──────────────────┐    │
//! │            │ concurrent lookups  │◀────▶│ ClientStore      │    │
//! │            └──────────┬──────────┘      └──────────────────┘    │
//! │                       ▼                                         │
//! │            canonicalize + compare ──▶ ReconcileReport           │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clientele_core::{load_declared_clients, ClienteleConfig, Reconciler};
//!
//! let config = ClienteleConfig::default();
//! let store = Arc::new(config.store.open()?);
//! let clients = load_declared_clients(path, &config.source)?.unwrap_or_default();
//!
//! let report = Reconciler::new(config.reconcile.clone(), store).run(&clients).await?;
//! ```

mod config;
mod error;
pub mod policy;
mod reconciler;
mod report;
pub mod source;

pub use config::{
    ApiConfig, ClienteleConfig, ConfigError, ReconcileConfig, SourceConfig, StoreBackend,
    StoreConfig,
};
pub use error::{ReconcileError, SchemaViolation};
pub use policy::{DeclaredClient, RawClient};
pub use reconciler::Reconciler;
pub use report::{ClientOutcome, OutcomeKind, ReconcileReport};
pub use source::load_declared_clients;

/// Core result type for reconciliation.
pub type Result<T> = std::result::Result<T, ReconcileError>;
