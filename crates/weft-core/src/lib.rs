//! weft-core
//!
//! Core primitives for weft:
//! - Subgraph descriptor/spec/record models
//! - Stable identity derivation for composite descriptor keys
//! - Registry session configuration and validation
//!
//! This crate performs no I/O and never reads environment variables. All
//! configuration must be provided explicitly by the caller; flag/environment
//! resolution belongs to the hosting layer.

pub mod config;
pub mod errors;
pub mod identity;
pub mod model;

pub use crate::errors::{WeftError, WeftResult};

/// Domain separation label for derived subgraph identifiers.
/// This must remain stable across versions.
pub const IDENTITY_DOMAIN: &str = "weft.v1.subgraph-id";

/// Default operational budgets.
pub mod defaults {
    use std::time::Duration;

    /// Total elapsed-time budget for retrying transient failures of a single
    /// registry call. Bounds worst-case reconciliation latency.
    pub const RETRY_BUDGET: Duration = Duration::from_secs(5);

    /// Per-request transport timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{validate_config, GraphRef, RegistryConfig};
    pub use crate::identity::{resolve, SubgraphId};
    pub use crate::model::{
        BuildStatus, SchemaError, SubgraphDescriptor, SubgraphRecord, SubgraphSpec, SubmitOutcome,
        ValidationOutcome,
    };
    pub use crate::{WeftError, WeftResult};
}
