//! Failure classification.
//!
//! Registry failures fall into two classes with different handling:
//! operational errors surface immediately (retrying cannot change the
//! registry's answer and would only burn the budget), transient errors are
//! retried. Classification uses the typed marker on `RegistryError`;
//! matching on error text is deliberately avoided.

use weft_registry_client::RegistryError;

/// Classification of a registry failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The registry's domain logic rejected the request.
    Operational,
    /// The request never completed; a retry may succeed.
    Transient,
}

/// Classify a registry failure.
pub fn classify(err: &RegistryError) -> ErrorClass {
    if err.is_operational() {
        ErrorClass::Operational
    } else {
        ErrorClass::Transient
    }
}
