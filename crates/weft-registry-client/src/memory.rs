//! In-memory registry client.
//!
//! A deterministic registry double for engine tests and local development.
//! It behaves like the remote does: submit is an idempotent upsert that may
//! report composition errors while still storing the schema, reads reflect
//! stored state, and removal of an absent subgraph is `NotFound`.
//!
//! Failure injection:
//! - `enqueue_failure` fails the next call of a kind, once
//! - `set_persistent_failure` fails every call of a kind until cleared
//!
//! Every call is recorded so tests can assert call ordering.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use weft_core::config::GraphRef;
use weft_core::identity::{resolve, SubgraphId};
use weft_core::model::{
    BuildStatus, SchemaError, SubgraphDescriptor, SubgraphRecord, SubgraphSpec, SubmitOutcome,
    ValidationOutcome,
};

use crate::client::RegistryClient;
use crate::error::{RegistryError, RegistryResult};

/// Kind of registry call, for failure injection and call-log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CallKind {
    Read,
    Submit,
    Remove,
    Validate,
    LatestBuild,
}

/// One recorded registry call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub kind: CallKind,
    /// Subgraph name, or the graph ref for build-status calls.
    pub subject: String,
}

#[derive(Default)]
struct Inner {
    records: BTreeMap<SubgraphId, SubgraphRecord>,
    revision: u64,
    calls: Vec<CallRecord>,
    one_shot_failures: BTreeMap<CallKind, VecDeque<RegistryError>>,
    persistent_failures: BTreeMap<CallKind, RegistryError>,
    submit_errors: Vec<SchemaError>,
    validation_errors: VecDeque<Vec<SchemaError>>,
    build: Option<BuildStatus>,
    hidden_reads: usize,
}

/// Registry client backed by process memory.
#[derive(Default)]
pub struct InMemoryRegistryClient {
    inner: Mutex<Inner>,
}

impl InMemoryRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a record directly, without recording a call.
    pub fn seed(&self, spec: &SubgraphSpec) -> SubgraphRecord {
        let mut inner = self.lock();
        inner.revision += 1;
        let now = OffsetDateTime::now_utc();
        let record = SubgraphRecord {
            descriptor: spec.descriptor.clone(),
            sdl: spec.sdl.clone(),
            routing_url: spec.routing_url.clone(),
            revision: inner.revision.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner
            .records
            .insert(resolve(&spec.descriptor), record.clone());
        record
    }

    /// Current stored record for a descriptor, if any.
    pub fn stored(&self, descriptor: &SubgraphDescriptor) -> Option<SubgraphRecord> {
        self.lock().records.get(&resolve(descriptor)).cloned()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls of a kind.
    pub fn call_count(&self, kind: CallKind) -> usize {
        self.lock().calls.iter().filter(|c| c.kind == kind).count()
    }

    /// Fail the next call of `kind` with `err`, once. Queued failures of the
    /// same kind apply in FIFO order.
    pub fn enqueue_failure(&self, kind: CallKind, err: RegistryError) {
        self.lock()
            .one_shot_failures
            .entry(kind)
            .or_default()
            .push_back(err);
    }

    /// Fail every call of `kind` with `err` until cleared.
    pub fn set_persistent_failure(&self, kind: CallKind, err: RegistryError) {
        self.lock().persistent_failures.insert(kind, err);
    }

    /// Clear a persistent failure for `kind`.
    pub fn clear_persistent_failure(&self, kind: CallKind) {
        self.lock().persistent_failures.remove(&kind);
    }

    /// Report `errors` on every subsequent submit (the schema is still
    /// stored, mirroring a registry that accepts broken-but-parseable
    /// schemas while reporting composition errors).
    pub fn set_submit_errors(&self, errors: Vec<SchemaError>) {
        self.lock().submit_errors = errors;
    }

    /// Fail the next validate call with the given composition errors.
    pub fn enqueue_validation_errors(&self, errors: Vec<SchemaError>) {
        self.lock().validation_errors.push_back(errors);
    }

    /// Set the reported supergraph build status (healthy when unset).
    pub fn set_build_status(&self, status: BuildStatus) {
        self.lock().build = Some(status);
    }

    /// Report the subgraph as absent on the next read, regardless of stored
    /// state. Models a resource created out-of-band between a caller's
    /// existence check and its submit.
    pub fn hide_next_read(&self) {
        self.lock().hidden_reads += 1;
    }

    fn begin(&self, kind: CallKind, subject: &str) -> RegistryResult<()> {
        let mut inner = self.lock();
        inner.calls.push(CallRecord {
            kind,
            subject: subject.to_string(),
        });
        if let Some(q) = inner.one_shot_failures.get_mut(&kind) {
            if let Some(err) = q.pop_front() {
                return Err(err);
            }
        }
        if let Some(err) = inner.persistent_failures.get(&kind) {
            return Err(err.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistryClient {
    async fn read(
        &self,
        descriptor: &SubgraphDescriptor,
    ) -> RegistryResult<Option<SubgraphRecord>> {
        self.begin(CallKind::Read, &descriptor.name)?;
        let mut inner = self.lock();
        if inner.hidden_reads > 0 {
            inner.hidden_reads -= 1;
            return Ok(None);
        }
        Ok(inner.records.get(&resolve(descriptor)).cloned())
    }

    async fn submit(&self, spec: &SubgraphSpec) -> RegistryResult<SubmitOutcome> {
        self.begin(CallKind::Submit, &spec.descriptor.name)?;

        let mut inner = self.lock();
        let id = resolve(&spec.descriptor);
        let existing = inner.records.get(&id).cloned();
        let was_created = existing.is_none();

        inner.revision += 1;
        let now = OffsetDateTime::now_utc();
        let record = SubgraphRecord {
            descriptor: spec.descriptor.clone(),
            sdl: spec.sdl.clone(),
            routing_url: spec.routing_url.clone(),
            revision: inner.revision.to_string(),
            created_at: existing.map(|r| r.created_at).unwrap_or(now),
            updated_at: now,
        };
        inner.records.insert(id, record);

        Ok(SubmitOutcome {
            was_created,
            composition_hash: format!("comp-{:08x}", inner.revision),
            errors: inner.submit_errors.clone(),
        })
    }

    async fn remove(&self, descriptor: &SubgraphDescriptor) -> RegistryResult<()> {
        self.begin(CallKind::Remove, &descriptor.name)?;

        let mut inner = self.lock();
        match inner.records.remove(&resolve(descriptor)) {
            Some(_) => Ok(()),
            None => Err(RegistryError::not_found(&descriptor.name)),
        }
    }

    async fn validate(
        &self,
        descriptor: &SubgraphDescriptor,
        sdl: &str,
    ) -> RegistryResult<ValidationOutcome> {
        self.begin(CallKind::Validate, &descriptor.name)?;

        let mut inner = self.lock();
        if let Some(errors) = inner.validation_errors.pop_front() {
            return Ok(ValidationOutcome::failed(errors));
        }

        match inner.records.get(&resolve(descriptor)) {
            None => Err(RegistryError::not_found(&descriptor.name)),
            Some(record) if record.sdl == sdl => Ok(ValidationOutcome::passed(Vec::new())),
            Some(record) => Ok(ValidationOutcome::passed(vec![format!(
                "schema for `{}` differs from active revision {}",
                record.descriptor.name, record.revision
            )])),
        }
    }

    async fn latest_build(&self, graph_ref: &GraphRef) -> RegistryResult<BuildStatus> {
        self.begin(CallKind::LatestBuild, &graph_ref.to_string())?;
        Ok(self.lock().build.clone().unwrap_or_else(BuildStatus::healthy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn spec(name: &str, sdl: &str) -> SubgraphSpec {
        SubgraphSpec::new(
            SubgraphDescriptor::new("shop", "production", name),
            sdl,
        )
    }

    #[tokio::test]
    async fn submit_then_read_roundtrip() {
        let client = InMemoryRegistryClient::new();
        let s = spec("inventory", "type Query { x: Int }");

        let outcome = client.submit(&s).await.unwrap();
        assert!(outcome.was_created);
        assert!(outcome.is_clean());

        let record = client.read(&s.descriptor).await.unwrap().unwrap();
        assert_eq!(record.sdl, s.sdl);
    }

    #[tokio::test]
    async fn resubmit_is_update_not_create() {
        let client = InMemoryRegistryClient::new();
        let s = spec("inventory", "type Query { x: Int }");

        client.submit(&s).await.unwrap();
        let second = client.submit(&s).await.unwrap();
        assert!(!second.was_created);
    }

    #[tokio::test]
    async fn remove_absent_is_not_found() {
        let client = InMemoryRegistryClient::new();
        let s = spec("inventory", "type Query { x: Int }");

        let err = client.remove(&s.descriptor).await.unwrap_err();
        assert_matches!(err, RegistryError::NotFound { .. });
    }

    #[tokio::test]
    async fn one_shot_failure_applies_once() {
        let client = InMemoryRegistryClient::new();
        let s = spec("inventory", "type Query { x: Int }");
        client.seed(&s);

        client.enqueue_failure(CallKind::Read, RegistryError::transport("reset"));

        let err = client.read(&s.descriptor).await.unwrap_err();
        assert!(!err.is_operational());
        assert!(client.read(&s.descriptor).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn validate_reports_drift() {
        let client = InMemoryRegistryClient::new();
        let s = spec("inventory", "type Query { x: Int }");
        client.seed(&s);

        let same = client
            .validate(&s.descriptor, "type Query { x: Int }")
            .await
            .unwrap();
        assert!(same.valid);
        assert!(same.changes.is_empty());

        let drifted = client
            .validate(&s.descriptor, "type Query { y: Int }")
            .await
            .unwrap();
        assert!(drifted.valid);
        assert_eq!(drifted.changes.len(), 1);
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let client = InMemoryRegistryClient::new();
        let s = spec("inventory", "type Query { x: Int }");

        client.submit(&s).await.unwrap();
        let _ = client.read(&s.descriptor).await.unwrap();

        let kinds: Vec<CallKind> = client.calls().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CallKind::Submit, CallKind::Read]);
    }
}
