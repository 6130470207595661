//! Máquina de estados del job: colas por fase, asignación con lease y
//! barrido de leases vencidos.
//!
//! Cada fase tiene su propio mutex. Ninguna operación toma los dos a la
//! vez, así que no hay orden de locks que respetar.

use chrono::{DateTime, Duration, Utc};
use mr_common::{JobStatus, ReportOutcome, Task, TaskId, TaskKind};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::job::JobSpec;
use crate::state::{PhaseQueues, TaskLocation};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("reduce_task_count debe ser mayor que cero")]
    ZeroReduceTasks,
    #[error("duración de lease fuera de rango: {0:?}")]
    InvalidLease(std::time::Duration),
}

pub struct Scheduler {
    job: JobSpec,
    lease: Duration,
    map: Mutex<PhaseQueues>,
    reduce: Mutex<PhaseQueues>,
}

/// Un mutex envenenado sólo indica que otro handler hizo panic; las colas
/// siguen siendo consistentes porque cada operación las deja válidas.
fn lock(queues: &Mutex<PhaseQueues>) -> MutexGuard<'_, PhaseQueues> {
    queues.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Scheduler {
    /// Crea todas las tareas del job en estado listo.
    pub fn new(job: JobSpec, lease: std::time::Duration) -> Result<Self, SchedulerError> {
        if job.reduce_task_count == 0 {
            return Err(SchedulerError::ZeroReduceTasks);
        }
        let lease = Duration::from_std(lease).map_err(|_| SchedulerError::InvalidLease(lease))?;

        let n_map = job.map_task_count();
        let n_reduce = job.reduce_task_count;

        let map_tasks = job
            .input_files
            .iter()
            .enumerate()
            .map(|(i, path)| Task::map(i as TaskId, path.clone(), n_map, n_reduce));
        let reduce_tasks = (0..n_reduce).map(|r| Task::reduce(r, n_map, n_reduce));

        info!(
            "job creado: {} tareas map, {} tareas reduce, lease={}s",
            n_map,
            n_reduce,
            lease.num_seconds()
        );

        Ok(Self {
            map: Mutex::new(PhaseQueues::new(map_tasks)),
            reduce: Mutex::new(PhaseQueues::new(reduce_tasks)),
            job,
            lease,
        })
    }

    pub fn job(&self) -> &JobSpec {
        &self.job
    }

    pub fn get_task(&self) -> Task {
        self.get_task_at(Utc::now())
    }

    /// Asigna la siguiente tarea:
    /// 1. una map lista, si hay
    /// 2. `Wait` si la fase map no terminó
    /// 3. una reduce lista, si hay
    /// 4. `Wait` si la fase reduce no terminó
    /// 5. `Finish`
    pub fn get_task_at(&self, now: DateTime<Utc>) -> Task {
        // un worker que pide tarea justo después de un vencimiento no tiene
        // que esperar al próximo tick del barrido
        self.sweep_expired_at(now);

        let assigned = lock(&self.map).assign_next(now, self.lease);
        if let Some(task) = assigned {
            info!("asignando tarea map {} (attempt={}, input={:?})", task.id, task.attempt, task.input_path);
            return task;
        }
        if !self.map_done() {
            return Task::wait();
        }

        let assigned = lock(&self.reduce).assign_next(now, self.lease);
        if let Some(task) = assigned {
            info!("asignando tarea reduce {} (attempt={})", task.id, task.attempt);
            return task;
        }
        if !self.reduce_done() {
            return Task::wait();
        }

        Task::finish()
    }

    /// Reporte de tarea terminada. Idempotente: sólo la asignación vigente
    /// puede completar la tarea, el resto se loguea y se ignora.
    pub fn report_task(&self, task: &Task) -> ReportOutcome {
        let outcome = match task.kind {
            TaskKind::Map => lock(&self.map).complete(task.id, task.attempt),
            TaskKind::Reduce => lock(&self.reduce).complete(task.id, task.attempt),
            TaskKind::Wait | TaskKind::Finish => {
                warn!("reporte de tarea centinela {} ignorado", task.kind);
                return ReportOutcome::Ignored;
            }
        };

        match outcome {
            ReportOutcome::Accepted => info!(
                "tarea {} {} terminada (attempt={}), {}",
                task.kind, task.id, task.attempt, task.stats
            ),
            ReportOutcome::Stale => warn!(
                "reporte de tarea {} {} con attempt={} ignorado: fue reasignada",
                task.kind, task.id, task.attempt
            ),
            ReportOutcome::NotInProgress => warn!(
                "reporte de tarea {} {} ignorado: ya no está en progreso",
                task.kind, task.id
            ),
            ReportOutcome::Ignored => {}
        }

        outcome
    }

    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// Re-encola todas las tareas con lease vencido en ambas fases.
    /// Es el único detector de fallas: no hay heartbeats.
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let expired_map = lock(&self.map).requeue_expired(now);
        for id in &expired_map {
            warn!("tarea map {} venció su lease, re-encolando", id);
        }

        let expired_reduce = lock(&self.reduce).requeue_expired(now);
        for id in &expired_reduce {
            warn!("tarea reduce {} venció su lease, re-encolando", id);
        }

        let total = expired_map.len() + expired_reduce.len();
        if total > 0 {
            debug!("barrido: {} tareas re-encoladas", total);
        }
        total
    }

    pub fn map_done(&self) -> bool {
        lock(&self.map).is_done()
    }

    pub fn reduce_done(&self) -> bool {
        lock(&self.reduce).is_done()
    }

    /// El job terminó cuando ambas fases no tienen tareas listas ni en progreso.
    pub fn done(&self) -> bool {
        self.map_done() && self.reduce_done()
    }

    pub fn status(&self) -> JobStatus {
        let map = lock(&self.map).status();
        let reduce = lock(&self.reduce).status();
        JobStatus {
            map,
            reduce,
            done: map.done && reduce.done,
        }
    }

    pub fn task_location(&self, kind: TaskKind, id: TaskId) -> Option<TaskLocation> {
        match kind {
            TaskKind::Map => lock(&self.map).locate(id),
            TaskKind::Reduce => lock(&self.reduce).locate(id),
            TaskKind::Wait | TaskKind::Finish => None,
        }
    }
}
