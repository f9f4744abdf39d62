use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "weft", version, about = "weft CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Registry endpoint URL (default: $WEFT_ENDPOINT).
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Registry API key (default: $WEFT_API_KEY).
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Graph ref as <graph-name>@<variant-name> (default: $WEFT_GRAPH_REF).
    #[arg(long, global = true)]
    pub graph_ref: Option<String>,

    /// Deadline in seconds for each registry operation. Only shortens the
    /// built-in retry budget.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Submit a subgraph schema, creating or updating the subgraph.
    Submit {
        /// Subgraph name.
        name: String,

        /// Path to the SDL schema file, or `-` for stdin.
        #[arg(long)]
        schema: String,

        /// Endpoint the router uses to reach this subgraph.
        #[arg(long)]
        routing_url: Option<String>,

        /// Fail instead of updating when the subgraph already exists.
        #[arg(long)]
        create_only: bool,
    },

    /// Show the current registry state of a subgraph.
    Status {
        name: String,
    },

    /// Dry-run composition check of a candidate schema.
    Validate {
        name: String,

        /// Path to the SDL schema file, or `-` for stdin.
        #[arg(long)]
        schema: String,
    },

    /// Remove a subgraph from the registry.
    Remove {
        name: String,
    },

    /// Adopt a subgraph that was submitted outside of weft.
    Import {
        name: String,
    },

    /// Run environment checks.
    Doctor,
}
