//! Full lifecycle against the in-memory registry: create, drift detection,
//! in-place update, rename replacement, removal.

use std::sync::Arc;

use weft_core::model::{SubgraphDescriptor, SubgraphSpec};
use weft_reconciler::{Error, Reconciler, Validator};
use weft_registry_client::{CallKind, InMemoryRegistryClient};

fn spec(name: &str, sdl: &str) -> SubgraphSpec {
    SubgraphSpec::new(SubgraphDescriptor::new("shop", "production", name), sdl)
        .with_routing_url(format!("https://{name}.internal/graphql"))
}

#[tokio::test]
async fn subgraph_lifecycle() {
    let client = Arc::new(InMemoryRegistryClient::new());
    let reconciler = Reconciler::new(client.clone());
    let validator = Validator::new(client.clone());

    // Create.
    let v1 = spec("inventory", "type Query { items: [String] }");
    let created = reconciler.create(&v1).await.unwrap();
    assert!(created.warnings.is_empty());
    let first_revision = created.record.revision.clone();

    // The same schema validates with no drift.
    let unchanged = validator
        .validate(&v1.descriptor, &v1.sdl)
        .await
        .unwrap();
    assert!(unchanged.valid && unchanged.changes.is_empty());

    // A candidate with changes validates, reporting drift, without mutating.
    let v2 = spec("inventory", "type Query { items: [String], count: Int }");
    let drifted = validator.validate(&v1.descriptor, &v2.sdl).await.unwrap();
    assert!(drifted.valid);
    assert!(!drifted.changes.is_empty());
    assert_eq!(
        client.stored(&v1.descriptor).unwrap().revision,
        first_revision
    );

    // In-place update refreshes the revision.
    let updated = reconciler.update(&v1.descriptor, &v2).await.unwrap();
    assert_ne!(updated.record.revision, first_revision);

    // Renaming replaces: old identity removed before the new one exists.
    let renamed = spec("stock", "type Query { items: [String], count: Int }");
    let replaced = reconciler.update(&v2.descriptor, &renamed).await.unwrap();
    assert_eq!(replaced.record.descriptor.name, "stock");
    assert!(client.stored(&v2.descriptor).is_none());

    let kinds: Vec<CallKind> = client.calls().iter().map(|c| c.kind).collect();
    let remove_at = kinds.iter().position(|k| *k == CallKind::Remove).unwrap();
    let last_submit = kinds.iter().rposition(|k| *k == CallKind::Submit).unwrap();
    assert!(remove_at < last_submit);

    // Delete, then delete again: both succeed.
    reconciler.delete(&renamed.descriptor).await.unwrap();
    reconciler.delete(&renamed.descriptor).await.unwrap();
    assert!(client.stored(&renamed.descriptor).is_none());

    // Importing the removed subgraph fails.
    let err = reconciler.import(&renamed.descriptor).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
