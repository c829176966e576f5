use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use credence_common::views::Certificate;
use credence_db::fixed_data::demo_certificates;

#[derive(Clone, Parser)]
pub struct ExampleParams {
    /// Where to write the example file.
    #[clap(short, long, default_value = "certificate.json")]
    pub output: PathBuf,
}

fn example_certificate() -> anyhow::Result<Certificate> {
    demo_certificates()
        .into_iter()
        .next()
        .map(Into::into)
        .context("no demo certificate available")
}

pub async fn example(ExampleParams { output }: ExampleParams) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&example_certificate()?)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Wrote example certificate to {}", output.display());
    Ok(())
}
