//! Data model for subgraph reconciliation.
//!
//! Design goals:
//! - **Dumb data:** models carry no policy. The reconciler and validator
//!   apply preconditions, retries, and error handling.
//! - **Value comparison:** specs are compared only by value. Records carry
//!   registry-assigned freshness (`revision`, timestamps) that is never
//!   constructed locally.
//! - **Serde-friendly:** all types round-trip through JSON for the hosting
//!   layer's output modes.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Composite key identifying a subgraph within the registry.
///
/// A change to any field addresses a different remote resource; replacement
/// semantics in the reconciler key off this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubgraphDescriptor {
    /// Graph the subgraph belongs to.
    pub graph: String,
    /// Variant (environment) of the graph.
    pub variant: String,
    /// Subgraph name, unique within a graph/variant pair.
    pub name: String,
}

impl SubgraphDescriptor {
    pub fn new(
        graph: impl Into<String>,
        variant: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            graph: graph.into(),
            variant: variant.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SubgraphDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.graph, self.variant, self.name)
    }
}

/// Desired state for a single subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphSpec {
    pub descriptor: SubgraphDescriptor,
    /// SDL schema text to submit for this subgraph.
    pub sdl: String,
    /// Endpoint the router uses to reach this subgraph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_url: Option<String>,
}

impl SubgraphSpec {
    pub fn new(descriptor: SubgraphDescriptor, sdl: impl Into<String>) -> Self {
        Self {
            descriptor,
            sdl: sdl.into(),
            routing_url: None,
        }
    }

    pub fn with_routing_url(mut self, url: impl Into<String>) -> Self {
        self.routing_url = Some(url.into());
        self
    }
}

/// Observed remote state for a single subgraph.
///
/// Only ever built from registry responses. `revision` is opaque and changes
/// on every successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgraphRecord {
    pub descriptor: SubgraphDescriptor,
    pub sdl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_url: Option<String>,
    pub revision: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A structured error reported by the registry for a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaError {
    /// Stable machine-readable code (e.g. `INVALID_GRAPHQL`).
    pub code: String,
    pub message: String,
}

impl SchemaError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Result of submitting a subgraph schema.
///
/// `was_created == false` with empty `errors` means the registry merged the
/// schema into an existing subgraph (submit is an idempotent upsert). Any
/// non-empty `errors` means the mutation did not durably apply and callers
/// must not persist the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub was_created: bool,
    /// Hash of the composition produced by this submit.
    pub composition_hash: String,
    #[serde(default)]
    pub errors: Vec<SchemaError>,
}

impl SubmitOutcome {
    /// True when the registry reported no composition errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of a dry-run composition check.
///
/// `changes` is only meaningful when `valid` is true; an empty list means the
/// candidate does not drift from the active schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<SchemaError>,
    #[serde(default)]
    pub changes: Vec<String>,
}

impl ValidationOutcome {
    /// A passing outcome with the given change list.
    pub fn passed(changes: Vec<String>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            changes,
        }
    }

    /// A failing outcome carrying the registry's errors.
    pub fn failed(errors: Vec<SchemaError>) -> Self {
        Self {
            valid: false,
            errors,
            changes: Vec::new(),
        }
    }
}

/// Composition status of the latest supergraph build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub healthy: bool,
    #[serde(default)]
    pub errors: Vec<SchemaError>,
}

impl BuildStatus {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            errors: Vec::new(),
        }
    }

    pub fn broken(errors: Vec<SchemaError>) -> Self {
        Self {
            healthy: false,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_display() {
        let d = SubgraphDescriptor::new("shop", "production", "inventory");
        assert_eq!(d.to_string(), "shop@production/inventory");
    }

    #[test]
    fn specs_compare_by_value() {
        let d = SubgraphDescriptor::new("shop", "production", "inventory");
        let a = SubgraphSpec::new(d.clone(), "type Query { x: Int }");
        let b = SubgraphSpec::new(d, "type Query { x: Int }");
        assert_eq!(a, b);
    }

    #[test]
    fn submit_outcome_clean() {
        let ok = SubmitOutcome {
            was_created: true,
            composition_hash: "abc".to_string(),
            errors: vec![],
        };
        assert!(ok.is_clean());

        let broken = SubmitOutcome {
            was_created: true,
            composition_hash: "abc".to_string(),
            errors: vec![SchemaError::new("INVALID_GRAPHQL", "boom")],
        };
        assert!(!broken.is_clean());
    }

    #[test]
    fn record_roundtrips_through_json() {
        let rec = SubgraphRecord {
            descriptor: SubgraphDescriptor::new("shop", "production", "inventory"),
            sdl: "type Query { x: Int }".to_string(),
            routing_url: Some("https://inventory.internal/graphql".to_string()),
            revision: "42".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let s = serde_json::to_string(&rec).unwrap();
        let back: SubgraphRecord = serde_json::from_str(&s).unwrap();
        assert_eq!(rec, back);
    }
}
