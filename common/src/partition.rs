use crate::kv::KeyValue;

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Hash FNV-1a de 32 bits con el bit de signo apagado.
/// Tiene que dar lo mismo en todos los procesos y corridas, por eso no
/// se usa `DefaultHasher` (su semilla no está garantizada).
pub fn ihash(key: &str) -> u32 {
    let hash = key.bytes().fold(FNV32_OFFSET_BASIS, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(FNV32_PRIME)
    });
    hash & 0x7fff_ffff
}

/// Partición reduce que le toca a una clave.
pub fn partition_for(key: &str, reduce_task_count: u32) -> u32 {
    ihash(key) % reduce_task_count.max(1)
}

/// Reparte los pares en exactamente `reduce_task_count` buckets.
/// El orden relativo dentro de cada bucket se mantiene.
pub fn partition_pairs(pairs: Vec<KeyValue>, reduce_task_count: u32) -> Vec<Vec<KeyValue>> {
    let n = reduce_task_count.max(1);
    let mut buckets: Vec<Vec<KeyValue>> = (0..n).map(|_| Vec::new()).collect();

    for kv in pairs {
        let idx = partition_for(&kv.key, n) as usize;
        buckets[idx].push(kv);
    }

    buckets
}
