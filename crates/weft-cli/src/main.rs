use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod config;
mod output;
mod sdl;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    cmd::dispatch(cli).await
}
