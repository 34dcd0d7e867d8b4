//! Per-client reconciliation outcomes.

use clientele_registry::FieldDiff;
use serde::Serialize;
use std::fmt;

/// How a declarative client relates to the store.
///
/// None of these stop a run; they are audit results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum OutcomeKind {
    /// Every declared field matches the stored client.
    Equal,

    /// One or more declared fields differ from the store.
    Differs {
        /// The differing fields, in comparison order.
        diffs: Vec<FieldDiff>,
    },

    /// The store has no client with this id.
    MissingInStore,
}

impl OutcomeKind {
    /// Short label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKind::Equal => "equal",
            OutcomeKind::Differs { .. } => "differs",
            OutcomeKind::MissingInStore => "missing-in-store",
        }
    }
}

/// The outcome for one declarative client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientOutcome {
    /// Canonical (lowercase hex) client id.
    pub client_id: String,

    /// What the comparison found.
    #[serde(flatten)]
    pub kind: OutcomeKind,
}

impl ClientOutcome {
    /// Returns true if the client matched the store.
    pub fn is_equal(&self) -> bool {
        matches!(self.kind, OutcomeKind::Equal)
    }
}

/// The result of a complete, successful reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// One outcome per declarative client, in source order.
    pub outcomes: Vec<ClientOutcome>,
}

impl ReconcileReport {
    /// Number of clients that match the store.
    pub fn equal(&self) -> usize {
        self.count(|kind| matches!(kind, OutcomeKind::Equal))
    }

    /// Number of clients that differ from the store.
    pub fn differs(&self) -> usize {
        self.count(|kind| matches!(kind, OutcomeKind::Differs { .. }))
    }

    /// Number of clients absent from the store.
    pub fn missing(&self) -> usize {
        self.count(|kind| matches!(kind, OutcomeKind::MissingInStore))
    }

    /// Returns true if every client matches the store.
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(ClientOutcome::is_equal)
    }

    /// Looks up the outcome for a canonical client id.
    pub fn outcome(&self, client_id: &str) -> Option<&ClientOutcome> {
        self.outcomes.iter().find(|o| o.client_id == client_id)
    }

    fn count(&self, pred: impl Fn(&OutcomeKind) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.kind)).count()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} clients checked: {} equal, {} differs, {} missing-in-store",
            self.outcomes.len(),
            self.equal(),
            self.differs(),
            self.missing()
        )
    }
}
