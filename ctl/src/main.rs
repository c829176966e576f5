use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{ExampleParams, RenderParams};

mod commands;

/// Operator tools for Credence certificates.
#[derive(Parser)]
#[command(version, about)]
pub struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Render a certificate JSON file to PDF or HTML.
    #[command(name = "render")]
    Render(RenderParams),

    /// Write an example certificate JSON file to start from.
    #[command(name = "example")]
    Example(ExampleParams),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or("credencectl=info,credence_api=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Render(params) => commands::render(params).await,
        Command::Example(params) => commands::example(params).await,
    }
}
