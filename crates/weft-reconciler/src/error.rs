//! Error types for the reconciliation engine.
//!
//! Operational registry failures are surfaced verbatim through
//! `Error::Registry`. Transient failures that outlive the retry budget are
//! wrapped in `Error::BudgetExhausted` so callers can distinguish "the
//! registry said no" from "the registry never answered".

use thiserror::Error;

use weft_core::model::SchemaError;
use weft_registry_client::RegistryError;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciliation engine error type.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The subgraph already exists and create refuses to adopt it.
    #[error(
        "subgraph `{name}` already exists; import the resource to manage a subgraph submitted elsewhere"
    )]
    AlreadyExists { name: String },

    /// The subgraph does not exist.
    #[error("subgraph `{name}` not found")]
    NotFound { name: String },

    /// The registry reported composition errors for a submitted schema.
    /// The mutation did not durably apply and no local state may advance.
    #[error("schema submission reported {} composition error(s)", errors.len())]
    Composition { errors: Vec<SchemaError> },

    /// The registry rejected a request for domain reasons.
    #[error(transparent)]
    Registry(RegistryError),

    /// Transient failures persisted past the retry budget.
    #[error("retry budget exhausted after {elapsed_ms} ms: {source}")]
    BudgetExhausted {
        elapsed_ms: u64,
        source: RegistryError,
    },

    /// A remote response violated a protocol invariant.
    #[error("registry invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn composition(errors: Vec<SchemaError>) -> Self {
        Self::Composition { errors }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// True when the failure may resolve on its own (callers can suggest
    /// retrying later in user messaging).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::BudgetExhausted { .. })
    }
}
