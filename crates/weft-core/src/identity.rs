//! Stable identity derivation for subgraph descriptors.
//!
//! A subgraph is addressed by a composite key (graph, variant, name). The
//! derived identifier must be:
//! - deterministic
//! - collision-free for distinct descriptors
//! - a function of the key fields only, never of schema content
//!
//! Construction: SHA-256 over the domain label followed by each key field
//! encoded as a big-endian u64 byte length plus its UTF-8 bytes. Length
//! prefixing keeps field boundaries unambiguous, so no separator character
//! has to be reserved inside field values. Two identifiers compare equal
//! exactly when their descriptors compare equal.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::SubgraphDescriptor;
use crate::IDENTITY_DOMAIN;

/// Derived external identifier for a subgraph.
///
/// Lowercase hex digest, stable for a given descriptor. Recomputed whenever
/// any key field changes, which is what triggers replacement semantics in
/// the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubgraphId(String);

impl SubgraphId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SubgraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the stable identifier for a descriptor.
pub fn resolve(descriptor: &SubgraphDescriptor) -> SubgraphId {
    let mut h = Sha256::new();
    h.update(IDENTITY_DOMAIN.as_bytes());
    for field in [&descriptor.graph, &descriptor.variant, &descriptor.name] {
        h.update((field.len() as u64).to_be_bytes());
        h.update(field.as_bytes());
    }
    SubgraphId(hex::encode(h.finalize()))
}
