use serde::{Deserialize, Serialize};

use crate::task::Task;

pub type WorkerId = String;

/* --------- Rutas HTTP del coordinador --------- */

pub const ROUTE_HEALTH: &str = "/health";
pub const ROUTE_NEXT_TASK: &str = "/api/v1/tasks/next";
pub const ROUTE_REPORT_TASK: &str = "/api/v1/tasks/report";
pub const ROUTE_JOB_STATUS: &str = "/api/v1/status";

/* --------- GetTask / ReportTask --------- */

/// Pedido de tarea. `worker_id` sólo se usa para logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaskRequest {
    pub worker_id: WorkerId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaskReply {
    pub task: Task,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTaskRequest {
    pub worker_id: WorkerId,
    pub task: Task,
}

/// Qué hizo el coordinador con un reporte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportOutcome {
    /// La tarea estaba en progreso con esa asignación: queda completada.
    Accepted,
    /// La tarea está en progreso pero con otra asignación (straggler).
    Stale,
    /// La tarea ya no está en progreso (completada o re-encolada).
    NotInProgress,
    /// Reporte de un centinela (`Wait`/`Finish`).
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTaskReply {
    pub task: Task,
    pub outcome: ReportOutcome,
}
