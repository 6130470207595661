use mr_common::{MapReduceApp, ReportOutcome, Task, TaskKind, WorkerId};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::executor;
use crate::rpc::{CoordinatorClient, RpcError};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("no se pudo crear el cliente del coordinador: {0}")]
    Client(RpcError),
    /// El coordinador respondió algo que el worker no entiende; seguir
    /// sería adivinar, así que el worker se detiene.
    #[error("violación de protocolo: {0}")]
    Protocol(RpcError),
}

/// Resumen de lo que hizo un worker hasta terminar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub map_tasks: u32,
    pub reduce_tasks: u32,
    pub aborted_tasks: u32,
    /// Reportes que el coordinador rechazó o que no llegaron.
    pub unacknowledged_reports: u32,
}

pub struct Worker {
    id: WorkerId,
    client: CoordinatorClient,
    app: Arc<dyn MapReduceApp>,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(app: Arc<dyn MapReduceApp>, config: WorkerConfig) -> Result<Self, WorkerError> {
        let client =
            CoordinatorClient::new(config.coordinator_url.clone()).map_err(WorkerError::Client)?;
        Ok(Self {
            id: new_worker_id(),
            client,
            app,
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Loop principal del worker:
    /// - pide tarea al coordinador
    /// - `Wait` o llamada fallida: espera y reintenta
    /// - `Map`/`Reduce`: ejecuta, escribe archivos y reporta
    /// - `Finish`: termina
    pub async fn run(&self) -> Result<WorkerSummary, WorkerError> {
        info!(
            "worker {} arrancando contra {} (dir={})",
            self.id,
            self.client.base_url(),
            self.config.work_dir.display()
        );

        let mut summary = WorkerSummary::default();
        let mut consecutive_failures: u32 = 0;

        loop {
            let task = match self.client.get_task(&self.id).await {
                Ok(task) => {
                    consecutive_failures = 0;
                    task
                }
                Err(e) if e.is_fatal() => return Err(WorkerError::Protocol(e)),
                Err(e) => {
                    consecutive_failures += 1;
                    if consecutive_failures >= self.config.max_poll_failures {
                        info!(
                            "worker {}: coordinador inalcanzable tras {} intentos, asumiendo job terminado",
                            self.id, consecutive_failures
                        );
                        return Ok(summary);
                    }
                    debug!("worker {}: GetTask falló ({}), reintentando", self.id, e);
                    sleep(self.config.wait_interval).await;
                    continue;
                }
            };

            match task.kind {
                TaskKind::Wait => sleep(self.config.wait_interval).await,
                TaskKind::Finish => {
                    info!("worker {}: todas las tareas terminadas, saliendo ({:?})", self.id, summary);
                    return Ok(summary);
                }
                TaskKind::Map | TaskKind::Reduce => self.execute_and_report(task, &mut summary).await,
            }
        }
    }

    async fn execute_and_report(&self, mut task: Task, summary: &mut WorkerSummary) {
        info!(
            "worker {}: tengo tarea {} {} (attempt={})",
            self.id, task.kind, task.id, task.attempt
        );

        let app = Arc::clone(&self.app);
        let work_dir = self.config.work_dir.clone();
        let to_run = task.clone();
        let handle = tokio::task::spawn_blocking(move || {
            executor::execute(app.as_ref(), &to_run, &work_dir)
        });

        // una falla no se reporta: el lease vence y otro worker la rehace
        let stats = match handle.await {
            Ok(Ok(stats)) => stats,
            Ok(Err(e)) => {
                warn!("worker {}: abortando tarea {} {}: {}", self.id, task.kind, task.id, e);
                summary.aborted_tasks += 1;
                return;
            }
            Err(e) => {
                warn!("worker {}: panic en tarea {} {}: {:?}", self.id, task.kind, task.id, e);
                summary.aborted_tasks += 1;
                return;
            }
        };

        task.stats = stats;
        match task.kind {
            TaskKind::Map => summary.map_tasks += 1,
            _ => summary.reduce_tasks += 1,
        }

        if !self.report_with_retry(&task).await {
            summary.unacknowledged_reports += 1;
        }
    }

    /// Reporta hasta `report_retries` veces. Si todas fallan se abandona en
    /// silencio: el coordinador reasignará la tarea cuando venza el lease.
    async fn report_with_retry(&self, task: &Task) -> bool {
        for attempt in 1..=self.config.report_retries {
            match self.client.report_task(&self.id, task).await {
                Ok(reply) => {
                    debug!(
                        "worker {}: reporte de {} {} -> {:?} ({})",
                        self.id, task.kind, task.id, reply.outcome, task.stats
                    );
                    return reply.outcome == ReportOutcome::Accepted;
                }
                Err(e) => {
                    debug!(
                        "worker {}: reporte {}/{} de {} {} falló: {}",
                        self.id, attempt, self.config.report_retries, task.kind, task.id, e
                    );
                }
            }
        }
        false
    }
}

fn new_worker_id() -> WorkerId {
    let host = hostname::get()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", host, &suffix[..8])
}
