use anyhow::{anyhow, Result};
use clap::Parser;
use mr_common::{app_by_name, APP_NAMES};
use mr_worker::{Worker, WorkerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mr-worker")]
#[command(about = "Worker map-reduce: pide tareas al coordinador hasta que el job termina")]
struct Cli {
    /// Aplicación map/reduce a ejecutar (wordcount, indexer)
    #[arg(value_name = "APP")]
    app: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mr_worker=debug")),
        )
        .init();

    let cli = Cli::parse();
    let app = app_by_name(&cli.app).ok_or_else(|| {
        anyhow!(
            "app desconocida '{}', opciones: {}",
            cli.app,
            APP_NAMES.join(", ")
        )
    })?;

    let worker = Worker::new(app, WorkerConfig::from_env())?;
    worker.run().await?;
    Ok(())
}
