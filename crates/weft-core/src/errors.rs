//! Error types for weft-core.
//!
//! These cover local failures only: invalid arguments, violated invariants,
//! serialization problems. Remote registry failures carry their own typed
//! error in the registry client crate.

use thiserror::Error;

/// Result alias for weft-core operations.
pub type WeftResult<T> = std::result::Result<T, WeftError>;

/// weft-core error type.
#[derive(Debug, Clone, Error)]
pub enum WeftError {
    /// A caller-provided value failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal invariant was violated.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// A value could not be serialized or deserialized.
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl WeftError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invariant violation error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let e = WeftError::invalid_argument("endpoint must not be empty");
        assert!(e.to_string().contains("endpoint must not be empty"));
    }
}
