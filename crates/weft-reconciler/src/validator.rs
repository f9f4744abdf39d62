//! Dry-run schema validation against the registry.
//!
//! Validation never mutates remote state: it asks the registry to compose a
//! candidate schema and reports either composition errors or the list of
//! changes relative to the currently active schema.
//!
//! Validation is preconditioned on the subgraph existing. A composition
//! check can succeed against an empty baseline, so checking an unknown name
//! reports `NotFound` instead of an empty success.

use std::sync::Arc;

use tracing::{debug, info};

use weft_core::model::{SubgraphDescriptor, ValidationOutcome};
use weft_registry_client::RegistryClient;

use crate::error::{Error, Result};
use crate::reconciler::ReconcilerConfig;
use crate::retry::with_retry;

/// Validates candidate subgraph schemas without mutating the registry.
pub struct Validator {
    client: Arc<dyn RegistryClient>,
    config: ReconcilerConfig,
}

impl Validator {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self::with_config(client, ReconcilerConfig::default())
    }

    pub fn with_config(client: Arc<dyn RegistryClient>, config: ReconcilerConfig) -> Self {
        Self { client, config }
    }

    /// Run a composition check of `candidate_sdl` for the named subgraph.
    ///
    /// `errors` non-empty in the outcome means the candidate does not
    /// compose and `changes` is not populated. An empty `changes` list on a
    /// valid outcome means no drift from the active schema.
    pub async fn validate(
        &self,
        descriptor: &SubgraphDescriptor,
        candidate_sdl: &str,
    ) -> Result<ValidationOutcome> {
        debug!(subgraph = %descriptor, "validating candidate schema");

        let observed =
            with_retry(self.config.retry_budget, || self.client.read(descriptor)).await?;
        if observed.is_none() {
            return Err(Error::not_found(&descriptor.name));
        }

        let outcome = with_retry(self.config.retry_budget, || {
            self.client.validate(descriptor, candidate_sdl)
        })
        .await?;

        if !outcome.valid && outcome.errors.is_empty() {
            return Err(Error::invariant(
                "validation failed but the registry reported no errors",
            ));
        }

        if outcome.valid && !outcome.changes.is_empty() {
            info!(
                subgraph = %descriptor,
                changes = outcome.changes.len(),
                "changes detected on subgraph"
            );
        }

        Ok(outcome)
    }
}
