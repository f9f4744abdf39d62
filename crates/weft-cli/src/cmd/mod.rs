use std::sync::Arc;

use anyhow::Result;

use weft_core::config::GraphRef;
use weft_reconciler::ReconcilerConfig;
use weft_registry_client::HttpRegistryClient;

use crate::args::{Cli, Command};

mod doctor;
mod import;
mod remove;
mod status;
mod submit;
mod validate;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Command::Submit {
            name,
            schema,
            routing_url,
            create_only,
        } => submit::run(&cli, &name, &schema, routing_url.as_deref(), create_only).await,
        Command::Status { name } => status::run(&cli, &name).await,
        Command::Validate { name, schema } => validate::run(&cli, &name, &schema).await,
        Command::Remove { name } => remove::run(&cli, &name).await,
        Command::Import { name } => import::run(&cli, &name).await,
        Command::Doctor => doctor::run(&cli).await,
    }
}

/// Shared session setup: one resolved config, one client.
fn session(cli: &Cli) -> Result<(Arc<HttpRegistryClient>, ReconcilerConfig, GraphRef)> {
    let config = crate::config::resolve(cli)?;
    let client = Arc::new(HttpRegistryClient::new(&config)?);
    let engine_config = ReconcilerConfig {
        retry_budget: config.retry_budget,
    };
    Ok((client, engine_config, config.graph_ref))
}
