//! Ejecución de una tarea map o reduce contra el directorio compartido.
//!
//! Todo es síncrono; el loop del worker lo corre en `spawn_blocking`.

use chrono::Utc;
use mr_common::{
    files, kv::sort_and_group, partition::partition_pairs, KeyValue, MapReduceApp, Task, TaskKind,
    TaskStats,
};
use std::{
    fs,
    io::{self, ErrorKind},
    path::Path,
};
use tracing::debug;

/// Ejecuta la tarea según su tipo y devuelve las métricas actualizadas.
pub fn execute(app: &dyn MapReduceApp, task: &Task, work_dir: &Path) -> io::Result<TaskStats> {
    match task.kind {
        TaskKind::Map => execute_map(app, task, work_dir),
        TaskKind::Reduce => execute_reduce(app, task, work_dir),
        TaskKind::Wait | TaskKind::Finish => Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("la tarea {} no es ejecutable", task.kind),
        )),
    }
}

/// Map: lee la entrada completa, aplica `app.map`, particiona por hash de
/// clave y escribe un intermedio `mr-<map>-<reduce>` por bucket no vacío.
/// Los buckets vacíos no generan archivo.
pub fn execute_map(app: &dyn MapReduceApp, task: &Task, work_dir: &Path) -> io::Result<TaskStats> {
    let input_path = task.input_path.as_deref().ok_or_else(|| {
        io::Error::new(
            ErrorKind::InvalidInput,
            format!("tarea map {} sin archivo de entrada", task.id),
        )
    })?;

    let bytes = fs::read(input_path)?;
    let content = String::from_utf8_lossy(&bytes);

    let pairs = app.map(input_path, &content);
    let item_count = pairs.len() as u64;

    let buckets = partition_pairs(pairs, task.reduce_task_count);
    for (reduce_id, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let path = files::write_intermediate(work_dir, task.id, reduce_id as u32, bucket)?;
        debug!("map {}: {} pares -> {}", task.id, bucket.len(), path.display());
    }

    let mut stats = task.stats.clone();
    stats.finish(Utc::now(), item_count);
    Ok(stats)
}

/// Reduce: junta los intermedios `mr-<m>-<id>` de todas las tareas map (un
/// archivo faltante cuenta como vacío), ordena, agrupa, aplica
/// `app.reduce` por clave y escribe `mr-out-<id>` en orden de clave.
pub fn execute_reduce(app: &dyn MapReduceApp, task: &Task, work_dir: &Path) -> io::Result<TaskStats> {
    let mut pairs: Vec<KeyValue> = Vec::new();
    for map_id in 0..task.map_task_count {
        pairs.extend(files::read_intermediate(work_dir, map_id, task.id)?);
    }
    let item_count = pairs.len() as u64;

    let output = reduce_pairs(app, pairs);
    let path = files::write_output(work_dir, task.id, &output)?;
    debug!("reduce {}: {} claves -> {}", task.id, output.len(), path.display());

    let mut stats = task.stats.clone();
    stats.finish(Utc::now(), item_count);
    Ok(stats)
}

/// Un par de salida por clave distinta, en orden creciente de clave.
pub fn reduce_pairs(app: &dyn MapReduceApp, pairs: Vec<KeyValue>) -> Vec<KeyValue> {
    sort_and_group(pairs)
        .into_iter()
        .map(|(key, values)| {
            let value = app.reduce(&key, &values);
            KeyValue { key, value }
        })
        .collect()
}
