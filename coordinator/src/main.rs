use anyhow::{Context, Result};
use clap::Parser;
use mr_coordinator::{CoordinatorConfig, JobSpec, Scheduler};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mr-coordinator")]
#[command(about = "Coordinador map-reduce: reparte tareas map/reduce a los workers")]
struct Cli {
    /// Cantidad de tareas reduce (particiones de salida)
    #[arg(short, long, default_value_t = 10)]
    reduce: u32,

    /// Archivos de entrada, uno por tarea map. Acepta patrones glob.
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mr_coordinator=debug,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = CoordinatorConfig::from_env();

    let job = JobSpec::from_patterns(&cli.inputs, cli.reduce).context("job inválido")?;
    let scheduler = Arc::new(Scheduler::new(job, config.lease)?);

    let listener = TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("no se pudo escuchar en {}", config.addr))?;
    info!(
        "coordinador escuchando en {} (lease={:?}, barrido={:?})",
        listener.local_addr()?,
        config.lease,
        config.sweep_interval
    );

    mr_coordinator::serve(scheduler, listener, config).await?;
    Ok(())
}
