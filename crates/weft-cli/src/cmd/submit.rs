use anyhow::Result;
use serde::Serialize;

use weft_core::model::SubgraphSpec;
use weft_reconciler::Reconciler;

use crate::args::Cli;
use crate::cmd;
use crate::output;
use crate::sdl;

#[derive(Debug, Serialize)]
pub struct SubmitOut {
    pub name: String,
    pub revision: String,
    pub created: bool,
    pub warnings: Vec<String>,
}

pub async fn run(
    cli: &Cli,
    name: &str,
    schema_path: &str,
    routing_url: Option<&str>,
    create_only: bool,
) -> Result<()> {
    let (client, config, graph_ref) = cmd::session(cli)?;
    let sdl = sdl::read(schema_path)?;

    let descriptor = graph_ref.descriptor(name);
    let mut spec = SubgraphSpec::new(descriptor.clone(), sdl);
    if let Some(url) = routing_url {
        spec = spec.with_routing_url(url);
    }

    let reconciler = Reconciler::with_config(client, config);

    let (reconciled, created) = if create_only {
        (reconciler.create(&spec).await?, true)
    } else if reconciler.read(&descriptor).await?.is_some() {
        (reconciler.update(&descriptor, &spec).await?, false)
    } else {
        (reconciler.create(&spec).await?, true)
    };

    for w in &reconciled.warnings {
        output::warn_line(w);
    }

    output::print(&SubmitOut {
        name: name.to_string(),
        revision: reconciled.record.revision,
        created,
        warnings: reconciled.warnings,
    })?;
    Ok(())
}
