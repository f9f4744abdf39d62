//! Typed registry errors.
//!
//! The engine decides retry behavior from the error *type*, never from the
//! error text. `is_operational` is the classification marker: an operational
//! error came from the registry's domain logic and retrying cannot change
//! the outcome; everything else is transport-level and may be retried.

use thiserror::Error;

/// Result alias for registry client operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Failure reported by (or on the way to) the registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The named subgraph does not exist in the registry.
    #[error("subgraph not found: {name}")]
    NotFound { name: String },

    /// The registry rejected the credentials.
    #[error("registry authentication failed: {message}")]
    Unauthorized { message: String },

    /// The registry rejected the request for domain reasons (malformed
    /// schema, invalid arguments, conflicting state).
    #[error("registry operation error [{code}]: {message}")]
    Operation { code: String, message: String },

    /// The request never completed: network failure, timeout, or a 5xx
    /// response.
    #[error("registry transport failure: {message}")]
    Transport {
        message: String,
        /// HTTP status, when the failure was a server-side 5xx.
        status: Option<u16>,
    },
}

impl RegistryError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn operation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Classification marker: true when the registry's domain logic rejected
    /// the request and a retry cannot change the outcome.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_operational() {
        assert!(RegistryError::not_found("inventory").is_operational());
        assert!(RegistryError::unauthorized("bad key").is_operational());
        assert!(RegistryError::operation("INVALID_GRAPHQL", "parse error").is_operational());
    }

    #[test]
    fn transport_errors_are_not_operational() {
        assert!(!RegistryError::transport("connection reset").is_operational());
        assert!(!RegistryError::server(503, "service unavailable").is_operational());
    }
}
