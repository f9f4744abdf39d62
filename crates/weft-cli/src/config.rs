//! Flag/environment binding for registry configuration.
//!
//! Precedence: explicit flag first, environment variable as fallback.
//! Missing values are configuration errors naming both the flag and the
//! variable. Resolution happens exactly once, here; everything below this
//! layer takes explicit values.

use std::time::Duration;

use anyhow::{bail, Result};

use weft_core::config::{validate_config, GraphRef, RegistryConfig};
use weft_reconciler::clamp_budget;

use crate::args::Cli;

pub const ENDPOINT_ENV: &str = "WEFT_ENDPOINT";
pub const API_KEY_ENV: &str = "WEFT_API_KEY";
pub const GRAPH_REF_ENV: &str = "WEFT_GRAPH_REF";

/// Resolve the registry configuration for this invocation.
pub fn resolve(cli: &Cli) -> Result<RegistryConfig> {
    let endpoint = flag_or_env(cli.endpoint.as_deref(), "--endpoint", ENDPOINT_ENV)?;
    let api_key = flag_or_env(cli.api_key.as_deref(), "--api-key", API_KEY_ENV)?;
    let graph_ref =
        GraphRef::parse(&flag_or_env(cli.graph_ref.as_deref(), "--graph-ref", GRAPH_REF_ENV)?)?;

    let mut config = RegistryConfig::new(endpoint, api_key, graph_ref);
    if let Some(secs) = cli.timeout {
        config.retry_budget = clamp_budget(config.retry_budget, Some(Duration::from_secs(secs)));
    }

    validate_config(&config)?;
    Ok(config)
}

fn flag_or_env(flag: Option<&str>, flag_name: &str, var: &str) -> Result<String> {
    if let Some(v) = flag {
        if !v.is_empty() {
            return Ok(v.to_string());
        }
    }
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => bail!("missing {flag_name}: pass the flag or set {var}"),
    }
}
