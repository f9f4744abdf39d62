use anyhow::{bail, Result};
use serde::Serialize;

use weft_core::model::SchemaError;
use weft_reconciler::Validator;

use crate::args::Cli;
use crate::cmd;
use crate::output;
use crate::sdl;

#[derive(Debug, Serialize)]
pub struct ValidateOut {
    pub name: String,
    pub valid: bool,
    pub errors: Vec<SchemaError>,
    pub changes: Vec<String>,
}

pub async fn run(cli: &Cli, name: &str, schema_path: &str) -> Result<()> {
    let (client, config, graph_ref) = cmd::session(cli)?;
    let candidate = sdl::read(schema_path)?;

    let descriptor = graph_ref.descriptor(name);
    let outcome = Validator::with_config(client, config)
        .validate(&descriptor, &candidate)
        .await?;

    if !outcome.changes.is_empty() {
        output::warn_line(&format!(
            "{} change(s) detected on `{name}`",
            outcome.changes.len()
        ));
        for change in &outcome.changes {
            output::warn_line(change);
        }
    }

    let valid = outcome.valid;
    let error_count = outcome.errors.len();
    output::print(&ValidateOut {
        name: name.to_string(),
        valid: outcome.valid,
        errors: outcome.errors,
        changes: outcome.changes,
    })?;

    if !valid {
        bail!("schema for `{name}` failed validation with {error_count} error(s)");
    }
    Ok(())
}
