//! Registry session configuration.
//!
//! Configuration objects are explicit and caller-provided. This crate does
//! not read environment variables: the hosting layer resolves flags and
//! environment exactly once and hands the result here.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::errors::{WeftError, WeftResult};
use crate::model::SubgraphDescriptor;

/// Parsed `<graph>@<variant>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRef {
    pub graph: String,
    pub variant: String,
}

impl GraphRef {
    /// Parse a `<graph>@<variant>` reference.
    ///
    /// Both parts must be non-empty and restricted to ASCII alphanumerics,
    /// `_` and `-`.
    pub fn parse(s: &str) -> WeftResult<Self> {
        let invalid = || {
            WeftError::invalid_argument(format!(
                "invalid graph ref `{s}`: expected <graph-name>@<variant-name>"
            ))
        };

        let (graph, variant) = s.split_once('@').ok_or_else(invalid)?;
        if graph.is_empty() || variant.is_empty() {
            return Err(invalid());
        }
        for part in [graph, variant] {
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(invalid());
            }
        }

        Ok(Self {
            graph: graph.to_string(),
            variant: variant.to_string(),
        })
    }

    /// Build the descriptor for a named subgraph under this ref.
    pub fn descriptor(&self, name: impl Into<String>) -> SubgraphDescriptor {
        SubgraphDescriptor::new(self.graph.clone(), self.variant.clone(), name)
    }
}

impl fmt::Display for GraphRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.graph, self.variant)
    }
}

/// Connection and budget configuration for a registry session.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the registry API.
    pub endpoint: String,
    /// API key used as a bearer credential.
    pub api_key: String,
    /// Graph/variant pair all operations are scoped to.
    pub graph_ref: GraphRef,
    /// Total elapsed-time budget for retrying transient failures of a single
    /// registry call.
    pub retry_budget: Duration,
    /// Per-request transport timeout.
    pub request_timeout: Duration,
}

impl RegistryConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        graph_ref: GraphRef,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            graph_ref,
            retry_budget: defaults::RETRY_BUDGET,
            request_timeout: defaults::REQUEST_TIMEOUT,
        }
    }

    /// Override the retry budget.
    pub fn with_retry_budget(mut self, budget: Duration) -> Self {
        self.retry_budget = budget;
        self
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &RegistryConfig) -> WeftResult<()> {
    if cfg.endpoint.trim().is_empty() {
        return Err(WeftError::invalid_argument("endpoint must not be empty"));
    }
    if !cfg.endpoint.starts_with("http://") && !cfg.endpoint.starts_with("https://") {
        return Err(WeftError::invalid_argument(format!(
            "endpoint must be an http(s) URL, got `{}`",
            cfg.endpoint
        )));
    }
    if cfg.api_key.trim().is_empty() {
        return Err(WeftError::invalid_argument("api_key must not be empty"));
    }
    if cfg.retry_budget.is_zero() {
        return Err(WeftError::invalid_argument(
            "retry_budget must be greater than zero",
        ));
    }
    if cfg.request_timeout.is_zero() {
        return Err(WeftError::invalid_argument(
            "request_timeout must be greater than zero",
        ));
    }
    Ok(())
}
