use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use credence_api::{config::CredenceApiConfig, server};
use credence_db::{fixed_data::demo_certificates, storage::memory::MemoryStorage};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CredenceApiConfig::parse();

    if !config.dump_openapi {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or(
                    "credence_api=info,credence_common=info,credence_db=info,tower_http=info"
                        .into(),
                ),
            )
            .pretty()
            .init();
    }

    let db = if config.seed_demo {
        let certificates = demo_certificates();
        info!(count = certificates.len(), "Seeding demo certificates");
        MemoryStorage::with_certificates(certificates)
    } else {
        MemoryStorage::new()
    };

    let (router, api) = server::make(config.clone(), Arc::new(db)).await?;

    if config.dump_openapi {
        let json = api.to_pretty_json()?;
        print!("{}", json);
        return Ok(());
    }

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}
