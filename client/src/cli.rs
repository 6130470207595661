use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use mr_common::{config::coordinator_base_url, JobStatus, PhaseStatus, ROUTE_JOB_STATUS};
use reqwest::Client;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mr-client")]
#[command(about = "CLI simple para consultar al coordinador map-reduce")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Muestra el estado actual del job
    Status,
    /// Espera hasta que el job termine, mostrando el progreso
    Wait {
        /// Intervalo entre consultas, en milisegundos
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let url = format!("{}{}", coordinator_base_url(), ROUTE_JOB_STATUS);

    match cli.command {
        Commands::Status => {
            let status = fetch_status(&client, &url).await?;
            print!("{}", render_status(&status));
        }
        Commands::Wait { interval_ms } => loop {
            let status = fetch_status(&client, &url).await?;
            print!("{}", render_status(&status));
            if status.done {
                println!("Job terminado.");
                break;
            }
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        },
    }

    Ok(())
}

async fn fetch_status(client: &Client, url: &str) -> Result<JobStatus> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        bail!("Error consultando {} (status {})", url, resp.status());
    }
    Ok(resp.json().await?)
}

fn render_phase(name: &str, phase: &PhaseStatus) -> String {
    let pct = if phase.total > 0 {
        format!("{:.1}%", phase.completed() as f64 / phase.total as f64 * 100.0)
    } else {
        "(sin tareas)".to_string()
    };
    format!(
        "  {:<7}: total={}, listas={}, en_curso={}, completadas={}, progreso={}\n",
        name,
        phase.total,
        phase.ready,
        phase.in_progress,
        phase.completed(),
        pct
    )
}

/// Texto que imprime la CLI para un estado de job.
pub fn render_status(status: &JobStatus) -> String {
    let mut out = String::from("Job:\n");
    out.push_str(&render_phase("map", &status.map));
    out.push_str(&render_phase("reduce", &status.reduce));
    out.push_str(&format!(
        "  estado : {}\n",
        if status.done { "terminado" } else { "en curso" }
    ));
    out
}
