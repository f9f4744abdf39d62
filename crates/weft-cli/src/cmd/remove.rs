use anyhow::Result;
use serde::Serialize;

use weft_reconciler::Reconciler;

use crate::args::Cli;
use crate::cmd;
use crate::output;

#[derive(Debug, Serialize)]
pub struct RemoveOut {
    pub name: String,
    pub removed: bool,
}

pub async fn run(cli: &Cli, name: &str) -> Result<()> {
    let (client, config, graph_ref) = cmd::session(cli)?;
    let descriptor = graph_ref.descriptor(name);

    Reconciler::with_config(client, config)
        .delete(&descriptor)
        .await?;

    output::print(&RemoveOut {
        name: name.to_string(),
        removed: true,
    })?;
    Ok(())
}
