//! Registry client capability.
//!
//! Everything the reconciliation engine needs from the remote registry is
//! expressed by this trait. Implementations must report failures through
//! `RegistryError` so callers can classify them without inspecting text.
//!
//! The registry is the sole authority for subgraph state. Implementations
//! hold no cache: every call reflects remote state at the time it returns.

use async_trait::async_trait;

use weft_core::config::GraphRef;
use weft_core::model::{
    BuildStatus, SubgraphDescriptor, SubgraphRecord, SubgraphSpec, SubmitOutcome,
    ValidationOutcome,
};

use crate::error::RegistryResult;

/// Authenticated access to the supergraph registry.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetch the current record for a subgraph. `Ok(None)` when absent.
    async fn read(
        &self,
        descriptor: &SubgraphDescriptor,
    ) -> RegistryResult<Option<SubgraphRecord>>;

    /// Submit (upsert) a subgraph schema.
    ///
    /// The registry may accept a schema as created while still reporting
    /// composition errors in the outcome; callers must inspect `errors`.
    async fn submit(&self, spec: &SubgraphSpec) -> RegistryResult<SubmitOutcome>;

    /// Remove a subgraph. Fails with `NotFound` when it does not exist.
    async fn remove(&self, descriptor: &SubgraphDescriptor) -> RegistryResult<()>;

    /// Dry-run composition check of a candidate schema. Never mutates.
    async fn validate(
        &self,
        descriptor: &SubgraphDescriptor,
        sdl: &str,
    ) -> RegistryResult<ValidationOutcome>;

    /// Composition status of the latest supergraph build for a graph ref.
    async fn latest_build(&self, graph_ref: &GraphRef) -> RegistryResult<BuildStatus>;
}
