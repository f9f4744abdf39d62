use anyhow::Result;
use serde::Serialize;

use weft_core::config::GraphRef;

use crate::args::Cli;
use crate::config::{API_KEY_ENV, ENDPOINT_ENV, GRAPH_REF_ENV};
use crate::output;

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub async fn run(cli: &Cli) -> Result<()> {
    let mut checks = Vec::new();

    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| std::env::var(ENDPOINT_ENV).ok());
    checks.push(Check {
        name: "endpoint".to_string(),
        ok: endpoint
            .as_deref()
            .is_some_and(|e| e.starts_with("http://") || e.starts_with("https://")),
        detail: format!("--endpoint or {ENDPOINT_ENV}, must be an http(s) URL"),
    });

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var(API_KEY_ENV).ok());
    checks.push(Check {
        name: "api_key".to_string(),
        ok: api_key.is_some_and(|k| !k.trim().is_empty()),
        detail: format!("--api-key or {API_KEY_ENV}"),
    });

    let graph_ref = cli
        .graph_ref
        .clone()
        .or_else(|| std::env::var(GRAPH_REF_ENV).ok());
    checks.push(Check {
        name: "graph_ref".to_string(),
        ok: graph_ref
            .as_deref()
            .is_some_and(|r| GraphRef::parse(r).is_ok()),
        detail: format!("--graph-ref or {GRAPH_REF_ENV}, format <graph-name>@<variant-name>"),
    });

    let ok = checks.iter().all(|c| c.ok);
    output::print(&DoctorOut { ok, checks })?;
    Ok(())
}
