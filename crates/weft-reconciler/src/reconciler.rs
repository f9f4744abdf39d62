//! Reconciler: the CRUD state machine for subgraph resources.
//!
//! Each operation issues one or more sequential registry calls and blocks
//! until completion or the retry budget is exhausted. Remote state is
//! re-read on every operation; nothing is cached between calls. A change in
//! the derived identity of a descriptor is a replacement: the old resource
//! is removed before anything is created under the new identity.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use weft_core::config::GraphRef;
use weft_core::defaults;
use weft_core::identity::resolve;
use weft_core::model::{SubgraphDescriptor, SubgraphRecord, SubgraphSpec};
use weft_registry_client::{RegistryClient, RegistryError};

use crate::error::{Error, Result};
use crate::retry::with_retry;

/// Configuration for the reconciler.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Elapsed-time budget for retrying transient failures of each registry
    /// call.
    pub retry_budget: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            retry_budget: defaults::RETRY_BUDGET,
        }
    }
}

/// Result of a successful create or update.
///
/// `warnings` carries non-fatal findings (idempotent-upsert note, unhealthy
/// current build) for the hosting layer to render.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciled {
    pub record: SubgraphRecord,
    pub warnings: Vec<String>,
}

/// Reconciles desired subgraph state against the registry.
pub struct Reconciler {
    client: Arc<dyn RegistryClient>,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self::with_config(client, ReconcilerConfig::default())
    }

    pub fn with_config(client: Arc<dyn RegistryClient>, config: ReconcilerConfig) -> Self {
        Self { client, config }
    }

    /// Create a subgraph the caller believes to be absent.
    ///
    /// Refuses to adopt a subgraph that already exists; `import` is the
    /// adoption path. On success the returned record carries the
    /// registry-assigned revision and timestamps from a fresh read-back.
    pub async fn create(&self, spec: &SubgraphSpec) -> Result<Reconciled> {
        let descriptor = &spec.descriptor;
        info!(subgraph = %descriptor, "creating subgraph");
        let mut warnings = Vec::new();

        let observed = self.read(descriptor).await?;
        if observed.is_some() {
            return Err(Error::already_exists(&descriptor.name));
        }

        self.check_current_build(descriptor, &mut warnings).await?;

        let outcome = with_retry(self.config.retry_budget, || self.client.submit(spec)).await?;
        if !outcome.is_clean() {
            return Err(Error::composition(outcome.errors));
        }
        if !outcome.was_created {
            warn!(subgraph = %descriptor, "submit merged into an existing subgraph");
            warnings.push(
                "no new subgraph was created; the registry merged the schema into an existing one"
                    .to_string(),
            );
        }

        let record = self.read_back(descriptor).await?;
        info!(subgraph = %descriptor, revision = %record.revision, "subgraph created");
        Ok(Reconciled { record, warnings })
    }

    /// Fetch observed state for a descriptor. Never mutates.
    pub async fn read(&self, descriptor: &SubgraphDescriptor) -> Result<Option<SubgraphRecord>> {
        with_retry(self.config.retry_budget, || self.client.read(descriptor)).await
    }

    /// Reconcile new desired state against a previously observed descriptor.
    ///
    /// Equal identities submit in place and refresh the record. Differing
    /// identities replace: the old resource is deleted first, and a failed
    /// delete aborts the update with both resources exactly as they were.
    pub async fn update(
        &self,
        prior: &SubgraphDescriptor,
        spec: &SubgraphSpec,
    ) -> Result<Reconciled> {
        let old_id = resolve(prior);
        let new_id = resolve(&spec.descriptor);

        if old_id != new_id {
            info!(old = %prior, new = %spec.descriptor, "identity changed, replacing subgraph");
            self.delete(prior).await?;
            return self.create(spec).await;
        }

        debug!(subgraph = %spec.descriptor, "submitting schema in place");
        let outcome = with_retry(self.config.retry_budget, || self.client.submit(spec)).await?;
        if !outcome.is_clean() {
            return Err(Error::composition(outcome.errors));
        }

        let record = self.read_back(&spec.descriptor).await?;
        info!(subgraph = %spec.descriptor, revision = %record.revision, "subgraph updated");
        Ok(Reconciled {
            record,
            warnings: Vec::new(),
        })
    }

    /// Remove a subgraph. Removal of an absent subgraph is success.
    pub async fn delete(&self, descriptor: &SubgraphDescriptor) -> Result<()> {
        match with_retry(self.config.retry_budget, || self.client.remove(descriptor)).await {
            Ok(()) => {
                info!(subgraph = %descriptor, "subgraph removed");
                Ok(())
            }
            Err(Error::Registry(RegistryError::NotFound { .. })) => {
                debug!(subgraph = %descriptor, "subgraph already absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Adopt an existing subgraph. Fails when absent.
    pub async fn import(&self, descriptor: &SubgraphDescriptor) -> Result<SubgraphRecord> {
        self.read(descriptor)
            .await?
            .ok_or_else(|| Error::not_found(&descriptor.name))
    }

    /// Advisory pre-flight: an unhealthy current build (or a domain-level
    /// refusal to report one) becomes a warning, transport exhaustion
    /// aborts.
    async fn check_current_build(
        &self,
        descriptor: &SubgraphDescriptor,
        warnings: &mut Vec<String>,
    ) -> Result<()> {
        let graph_ref = GraphRef {
            graph: descriptor.graph.clone(),
            variant: descriptor.variant.clone(),
        };

        match with_retry(self.config.retry_budget, || {
            self.client.latest_build(&graph_ref)
        })
        .await
        {
            Ok(build) if !build.healthy => {
                warn!(graph = %graph_ref, errors = build.errors.len(), "current supergraph build is unhealthy");
                warnings.push(format!(
                    "current supergraph build has {} composition error(s)",
                    build.errors.len()
                ));
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(Error::Registry(err)) => {
                warnings.push(format!("could not check current supergraph build: {err}"));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn read_back(&self, descriptor: &SubgraphDescriptor) -> Result<SubgraphRecord> {
        self.read(descriptor)
            .await?
            .ok_or_else(|| Error::invariant("subgraph missing immediately after submit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use weft_core::model::{BuildStatus, SchemaError};
    use weft_registry_client::{CallKind, InMemoryRegistryClient};

    fn descriptor(name: &str) -> SubgraphDescriptor {
        SubgraphDescriptor::new("shop", "production", name)
    }

    fn spec(name: &str, sdl: &str) -> SubgraphSpec {
        SubgraphSpec::new(descriptor(name), sdl)
    }

    fn engine() -> (Reconciler, Arc<InMemoryRegistryClient>) {
        let client = Arc::new(InMemoryRegistryClient::new());
        (Reconciler::new(client.clone()), client)
    }

    #[tokio::test]
    async fn create_reads_submits_and_reads_back() {
        let (engine, client) = engine();
        let s = spec("inventory", "type Query { x: Int }");

        let reconciled = engine.create(&s).await.unwrap();
        assert_eq!(reconciled.record.sdl, s.sdl);
        assert!(reconciled.warnings.is_empty());

        let kinds: Vec<CallKind> = client.calls().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                CallKind::Read,
                CallKind::LatestBuild,
                CallKind::Submit,
                CallKind::Read,
            ]
        );
    }

    #[tokio::test]
    async fn create_refuses_to_adopt() {
        let (engine, client) = engine();
        let s = spec("inventory", "type Query { x: Int }");
        client.seed(&s);

        let err = engine.create(&s).await.unwrap_err();
        assert_matches!(err, Error::AlreadyExists { .. });
        assert_eq!(client.call_count(CallKind::Submit), 0);
    }

    #[tokio::test]
    async fn create_warns_on_unhealthy_build() {
        let (engine, client) = engine();
        client.set_build_status(BuildStatus::broken(vec![SchemaError::new(
            "COMPOSITION_ERROR",
            "field collision",
        )]));

        let reconciled = engine
            .create(&spec("inventory", "type Query { x: Int }"))
            .await
            .unwrap();
        assert_eq!(reconciled.warnings.len(), 1);
        assert!(reconciled.warnings[0].contains("composition error"));
    }

    #[tokio::test]
    async fn create_warns_when_submit_merged() {
        let (engine, client) = engine();
        let s = spec("inventory", "type Query { x: Int }");
        // Subgraph exists remotely but the precheck misses it: created
        // out-of-band between the read and the submit.
        client.seed(&s);
        client.hide_next_read();

        let reconciled = engine.create(&s).await.unwrap();
        assert_eq!(reconciled.warnings.len(), 1);
        assert!(reconciled.warnings[0].contains("no new subgraph was created"));
    }

    #[tokio::test]
    async fn create_fails_on_composition_errors() {
        let (engine, client) = engine();
        client.set_submit_errors(vec![SchemaError::new("INVALID_GRAPHQL", "parse error")]);

        let err = engine
            .create(&spec("inventory", "type Query { x: Int }"))
            .await
            .unwrap_err();
        assert_matches!(err, Error::Composition { ref errors } if errors.len() == 1);
    }

    #[tokio::test]
    async fn update_in_place_refreshes_revision() {
        let (engine, client) = engine();
        let s1 = spec("inventory", "type Query { x: Int }");
        let seeded = client.seed(&s1);

        let s2 = spec("inventory", "type Query { x: Int, y: Int }");
        let reconciled = engine.update(&s1.descriptor, &s2).await.unwrap();

        assert_eq!(reconciled.record.sdl, s2.sdl);
        assert_ne!(reconciled.record.revision, seeded.revision);
        assert_eq!(client.call_count(CallKind::Remove), 0);
    }

    #[tokio::test]
    async fn update_with_new_name_removes_old_before_submit() {
        let (engine, client) = engine();
        let old = spec("inventory", "type Query { x: Int }");
        client.seed(&old);

        let new = spec("warehouse", "type Query { x: Int }");
        engine.update(&old.descriptor, &new).await.unwrap();

        let kinds: Vec<CallKind> = client.calls().iter().map(|c| c.kind).collect();
        let remove_at = kinds.iter().position(|k| *k == CallKind::Remove);
        let submit_at = kinds.iter().position(|k| *k == CallKind::Submit);
        assert!(remove_at.is_some());
        assert!(remove_at < submit_at);

        assert!(client.stored(&old.descriptor).is_none());
        assert!(client.stored(&new.descriptor).is_some());
    }

    #[tokio::test]
    async fn update_aborts_replacement_when_remove_fails() {
        let (engine, client) = engine();
        let old = spec("inventory", "type Query { x: Int }");
        client.seed(&old);
        client.enqueue_failure(
            CallKind::Remove,
            RegistryError::unauthorized("key lacks delete permission"),
        );

        let new = spec("warehouse", "type Query { x: Int }");
        let err = engine.update(&old.descriptor, &new).await.unwrap_err();

        assert_matches!(err, Error::Registry(RegistryError::Unauthorized { .. }));
        // The old resource is untouched and nothing was submitted under the
        // new identity.
        assert_eq!(client.call_count(CallKind::Submit), 0);
        assert!(client.stored(&old.descriptor).is_some());
        assert!(client.stored(&new.descriptor).is_none());
    }

    #[tokio::test]
    async fn delete_absent_is_success() {
        let (engine, client) = engine();
        engine.delete(&descriptor("inventory")).await.unwrap();
        assert_eq!(client.call_count(CallKind::Remove), 1);
    }

    #[tokio::test]
    async fn import_absent_fails() {
        let (engine, _client) = engine();
        let err = engine.import(&descriptor("inventory")).await.unwrap_err();
        assert_matches!(err, Error::NotFound { .. });
    }

    #[tokio::test]
    async fn import_returns_existing_record() {
        let (engine, client) = engine();
        let s = spec("inventory", "type Query { x: Int }");
        let seeded = client.seed(&s);

        let record = engine.import(&s.descriptor).await.unwrap();
        assert_eq!(record.revision, seeded.revision);
    }
}
