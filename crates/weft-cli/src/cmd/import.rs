use anyhow::Result;

use weft_reconciler::Reconciler;

use crate::args::Cli;
use crate::cmd;
use crate::output;

pub async fn run(cli: &Cli, name: &str) -> Result<()> {
    let (client, config, graph_ref) = cmd::session(cli)?;
    let descriptor = graph_ref.descriptor(name);

    let record = Reconciler::with_config(client, config)
        .import(&descriptor)
        .await?;

    output::print(&record)?;
    Ok(())
}
