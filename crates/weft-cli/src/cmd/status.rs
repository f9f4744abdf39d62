use anyhow::{anyhow, Result};

use weft_reconciler::Reconciler;

use crate::args::Cli;
use crate::cmd;
use crate::output;

pub async fn run(cli: &Cli, name: &str) -> Result<()> {
    let (client, config, graph_ref) = cmd::session(cli)?;
    let descriptor = graph_ref.descriptor(name);

    let reconciler = Reconciler::with_config(client, config);
    let record = reconciler
        .read(&descriptor)
        .await?
        .ok_or_else(|| anyhow!("subgraph `{name}` not found in {graph_ref}"))?;

    output::print(&record)?;
    Ok(())
}
