use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id de tarea, único dentro de su fase (map o reduce).
pub type TaskId = u32;

/// Tipo de tarea que viaja en cada respuesta del coordinador.
/// `Wait` y `Finish` son centinelas: no llevan payload útil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Map,
    Reduce,
    /// No hay trabajo asignable todavía; reintentar más tarde.
    Wait,
    /// El job terminó; el worker debe dejar de pedir tareas.
    Finish,
}

impl TaskKind {
    pub fn is_sentinel(self) -> bool {
        matches!(self, TaskKind::Wait | TaskKind::Finish)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskKind::Map => "map",
            TaskKind::Reduce => "reduce",
            TaskKind::Wait => "wait",
            TaskKind::Finish => "finish",
        };
        f.write_str(name)
    }
}

/// Métricas de ejecución de una tarea.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub begin_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    /// Pares procesados: emitidos por el map, o leídos por el reduce.
    pub item_count: u64,
}

impl TaskStats {
    pub fn started_at(now: DateTime<Utc>) -> Self {
        Self {
            begin_time: Some(now),
            ..Self::default()
        }
    }

    /// Cierra las métricas. Si nunca se marcó el inicio, se toma `now`.
    pub fn finish(&mut self, now: DateTime<Utc>, item_count: u64) {
        let begin = *self.begin_time.get_or_insert(now);
        self.end_time = Some(now);
        self.elapsed_ms = (now - begin).num_milliseconds().max(0) as u64;
        self.item_count = item_count;
    }
}

impl fmt::Display for TaskStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "items={} elapsed={}ms", self.item_count, self.elapsed_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,

    /// Archivo de entrada; sólo tiene sentido en tareas map.
    pub input_path: Option<String>,

    /// Fin del lease actual. `None` mientras la tarea no está asignada.
    pub deadline: Option<DateTime<Utc>>,

    /// Fan-out completo del job, para que cualquier worker sepa
    /// cuántos archivos intermedios producir o recolectar.
    pub map_task_count: u32,
    pub reduce_task_count: u32,

    /// Número de asignación. El coordinador lo incrementa cada vez que
    /// entrega la tarea y sólo acepta el reporte de la asignación vigente.
    pub attempt: u32,

    pub stats: TaskStats,
}

impl Task {
    pub fn map(
        id: TaskId,
        input_path: impl Into<String>,
        map_task_count: u32,
        reduce_task_count: u32,
    ) -> Self {
        Self {
            id,
            kind: TaskKind::Map,
            input_path: Some(input_path.into()),
            deadline: None,
            map_task_count,
            reduce_task_count,
            attempt: 0,
            stats: TaskStats::default(),
        }
    }

    pub fn reduce(id: TaskId, map_task_count: u32, reduce_task_count: u32) -> Self {
        Self {
            id,
            kind: TaskKind::Reduce,
            input_path: None,
            deadline: None,
            map_task_count,
            reduce_task_count,
            attempt: 0,
            stats: TaskStats::default(),
        }
    }

    pub fn wait() -> Self {
        Self::sentinel(TaskKind::Wait)
    }

    pub fn finish() -> Self {
        Self::sentinel(TaskKind::Finish)
    }

    fn sentinel(kind: TaskKind) -> Self {
        Self {
            id: 0,
            kind,
            input_path: None,
            deadline: None,
            map_task_count: 0,
            reduce_task_count: 0,
            attempt: 0,
            stats: TaskStats::default(),
        }
    }

    /// Arranca un lease nuevo: deadline, métricas y número de asignación.
    pub fn start_lease(&mut self, now: DateTime<Utc>, lease: Duration) {
        self.deadline = Some(now + lease);
        self.stats = TaskStats::started_at(now);
        self.attempt += 1;
    }

    pub fn lease_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.map_or(false, |deadline| deadline < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_lease_resets_deadline_stats_and_bumps_attempt() {
        let now = Utc::now();
        let mut task = Task::map(3, "pg-1.txt", 4, 2);
        task.stats.item_count = 99;

        task.start_lease(now, Duration::seconds(20));

        assert_eq!(task.deadline, Some(now + Duration::seconds(20)));
        assert_eq!(task.stats, TaskStats::started_at(now));
        assert_eq!(task.attempt, 1);

        task.start_lease(now, Duration::seconds(20));
        assert_eq!(task.attempt, 2);
    }

    #[test]
    fn lease_expired_only_strictly_after_deadline() {
        let now = Utc::now();
        let mut task = Task::reduce(0, 2, 2);
        assert!(!task.lease_expired(now), "sin lease no hay expiración");

        task.start_lease(now, Duration::seconds(20));
        assert!(!task.lease_expired(now + Duration::seconds(20)));
        assert!(task.lease_expired(now + Duration::seconds(21)));
    }

    #[test]
    fn stats_finish_computes_elapsed() {
        let begin = Utc::now();
        let mut stats = TaskStats::started_at(begin);
        stats.finish(begin + Duration::milliseconds(1500), 42);

        assert_eq!(stats.elapsed_ms, 1500);
        assert_eq!(stats.item_count, 42);
        assert_eq!(stats.to_string(), "items=42 elapsed=1500ms");
    }

    #[test]
    fn task_kind_serializes_as_plain_tag() {
        let json = serde_json::to_string(&Task::finish()).unwrap();
        assert!(json.contains("\"kind\":\"Finish\""));

        let err = serde_json::from_str::<TaskKind>("\"Sleep\"");
        assert!(err.is_err(), "un tag desconocido no debe decodificar");
    }
}
