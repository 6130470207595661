// coordinator/src/state.rs

use chrono::{DateTime, Duration, Utc};
use mr_common::{PhaseStatus, ReportOutcome, Task, TaskId};
use std::collections::BTreeMap;

/// Dónde está una tarea dentro de su fase. Si no aparece, ya terminó.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLocation {
    Ready,
    InProgress,
}

/// Colas de una fase. Un id está en `ready`, en `in_progress` o en
/// ninguna (completado); nunca en ambas.
#[derive(Debug, Default)]
pub struct PhaseQueues {
    total: u32,
    // tareas pendientes de asignar, ordenadas por id
    ready: BTreeMap<TaskId, Task>,
    // tareas asignadas con lease vigente o vencido sin barrer
    in_progress: BTreeMap<TaskId, Task>,
}

impl PhaseQueues {
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Self {
        let ready: BTreeMap<TaskId, Task> = tasks.into_iter().map(|t| (t.id, t)).collect();
        Self {
            total: ready.len() as u32,
            ready,
            in_progress: BTreeMap::new(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.ready.is_empty() && self.in_progress.is_empty()
    }

    pub fn locate(&self, id: TaskId) -> Option<TaskLocation> {
        if self.ready.contains_key(&id) {
            Some(TaskLocation::Ready)
        } else if self.in_progress.contains_key(&id) {
            Some(TaskLocation::InProgress)
        } else {
            None
        }
    }

    /// Saca la tarea lista de menor id, le arranca un lease y la pasa a
    /// en progreso. Devuelve la copia que se entrega al worker.
    pub fn assign_next(&mut self, now: DateTime<Utc>, lease: Duration) -> Option<Task> {
        let (id, mut task) = self.ready.pop_first()?;
        task.start_lease(now, lease);
        self.in_progress.insert(id, task.clone());
        Some(task)
    }

    /// Marca como completada la asignación `attempt` de la tarea `id`.
    pub fn complete(&mut self, id: TaskId, attempt: u32) -> ReportOutcome {
        match self.in_progress.get(&id) {
            Some(current) if current.attempt == attempt => {
                self.in_progress.remove(&id);
                ReportOutcome::Accepted
            }
            Some(_) => ReportOutcome::Stale,
            None => ReportOutcome::NotInProgress,
        }
    }

    /// Devuelve a `ready` todas las tareas con lease vencido, sin importar
    /// hace cuánto vencieron. Devuelve los ids re-encolados.
    pub fn requeue_expired(&mut self, now: DateTime<Utc>) -> Vec<TaskId> {
        let expired: Vec<TaskId> = self
            .in_progress
            .values()
            .filter(|t| t.lease_expired(now))
            .map(|t| t.id)
            .collect();

        for id in &expired {
            if let Some(mut task) = self.in_progress.remove(id) {
                // una tarea lista no tiene lease; el próximo assign_next le da uno nuevo
                task.deadline = None;
                self.ready.insert(*id, task);
            }
        }

        expired
    }

    pub fn status(&self) -> PhaseStatus {
        PhaseStatus {
            total: self.total,
            ready: self.ready.len() as u32,
            in_progress: self.in_progress.len() as u32,
            done: self.is_done(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_queues(n: u32) -> PhaseQueues {
        PhaseQueues::new((0..n).map(|i| Task::map(i, format!("in-{i}.txt"), n, 2)))
    }

    #[test]
    fn new_queues_start_all_ready() {
        let q = map_queues(3);
        for id in 0..3 {
            assert_eq!(q.locate(id), Some(TaskLocation::Ready));
        }
        assert!(!q.is_done());
        assert_eq!(q.status().ready, 3);
    }

    #[test]
    fn empty_queues_are_done() {
        let q = PhaseQueues::new(Vec::new());
        assert!(q.is_done());
        assert_eq!(q.status().total, 0);
    }

    #[test]
    fn assign_next_picks_lowest_id_and_moves_it() {
        let now = Utc::now();
        let mut q = map_queues(3);

        let t = q.assign_next(now, Duration::seconds(20)).unwrap();

        assert_eq!(t.id, 0);
        assert_eq!(t.attempt, 1);
        assert_eq!(t.deadline, Some(now + Duration::seconds(20)));
        assert_eq!(q.locate(0), Some(TaskLocation::InProgress));
        assert_eq!(q.assign_next(now, Duration::seconds(20)).unwrap().id, 1);
    }

    #[test]
    fn complete_removes_only_matching_attempt() {
        let now = Utc::now();
        let mut q = map_queues(1);
        let t = q.assign_next(now, Duration::seconds(20)).unwrap();

        assert_eq!(q.complete(t.id, t.attempt + 1), ReportOutcome::Stale);
        assert_eq!(q.locate(t.id), Some(TaskLocation::InProgress));

        assert_eq!(q.complete(t.id, t.attempt), ReportOutcome::Accepted);
        assert_eq!(q.locate(t.id), None);
        assert!(q.is_done());

        assert_eq!(q.complete(t.id, t.attempt), ReportOutcome::NotInProgress);
    }

    #[test]
    fn requeue_expired_moves_every_expired_task_back() {
        let t0 = Utc::now();
        let mut q = map_queues(3);
        q.assign_next(t0, Duration::seconds(20)).unwrap();
        q.assign_next(t0 + Duration::seconds(5), Duration::seconds(20)).unwrap();
        q.assign_next(t0 + Duration::seconds(60), Duration::seconds(20)).unwrap();

        // vencieron hace mucho o hace poco: se re-encolan igual
        let requeued = q.requeue_expired(t0 + Duration::seconds(70));

        assert_eq!(requeued, vec![0, 1]);
        assert_eq!(q.locate(0), Some(TaskLocation::Ready));
        assert_eq!(q.locate(1), Some(TaskLocation::Ready));
        assert_eq!(q.locate(2), Some(TaskLocation::InProgress));
        assert_eq!(q.status().in_progress, 1);
    }

    #[test]
    fn requeued_task_gets_a_fresh_lease_on_reassignment() {
        let t0 = Utc::now();
        let lease = Duration::seconds(20);
        let mut q = map_queues(1);
        let first = q.assign_next(t0, lease).unwrap();

        let later = t0 + Duration::seconds(30);
        q.requeue_expired(later);
        assert_eq!(q.ready[&0].deadline, None);

        let again = q.assign_next(later, lease).unwrap();
        assert_eq!(again.id, first.id);
        assert_eq!(again.attempt, first.attempt + 1);
        assert_eq!(again.deadline, Some(later + lease));
        assert!(!again.lease_expired(later));
    }
}
