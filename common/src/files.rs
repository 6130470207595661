//! Convenciones de nombres y escritura atómica en el directorio compartido.
//!
//! - intermedio: `mr-<map>-<reduce>`, un objeto JSON `{"Key","Value"}` por línea
//! - salida final: `mr-out-<reduce>`, líneas `"<clave> <valor>"`
//! - temporales: `tmp_<nombre final>_<aleatorio>` en el mismo directorio

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::trace;

use crate::kv::KeyValue;
use crate::task::TaskId;

pub fn intermediate_file_name(map_id: TaskId, reduce_id: TaskId) -> String {
    format!("mr-{}-{}", map_id, reduce_id)
}

pub fn output_file_name(reduce_id: TaskId) -> String {
    format!("mr-out-{}", reduce_id)
}

/// Escribe `file_name` dentro de `dir` sin que nadie pueda ver un archivo a
/// medias: se escribe a un temporal en el mismo directorio y luego se hace
/// rename. Si `write` falla, el temporal se borra y el destino no se toca.
pub fn write_atomically<F>(dir: &Path, file_name: &str, write: F) -> io::Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> io::Result<()>,
{
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!("tmp_{}_", file_name))
        .tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    let final_path = dir.join(file_name);
    trace!("rename {} -> {}", tmp.path().display(), final_path.display());
    tmp.persist(&final_path).map_err(|e| e.error)?;
    Ok(final_path)
}

/// Escribe un bucket de pares del map `map_id` para el reduce `reduce_id`.
pub fn write_intermediate(
    dir: &Path,
    map_id: TaskId,
    reduce_id: TaskId,
    pairs: &[KeyValue],
) -> io::Result<PathBuf> {
    write_atomically(dir, &intermediate_file_name(map_id, reduce_id), |w| {
        for kv in pairs {
            serde_json::to_writer(&mut *w, kv)?;
            w.write_all(b"\n")?;
        }
        Ok(())
    })
}

/// Lee el intermedio `(map_id, reduce_id)`. Un archivo inexistente es un
/// bucket vacío (el map no emitió nada para esa partición), no un error.
pub fn read_intermediate(dir: &Path, map_id: TaskId, reduce_id: TaskId) -> io::Result<Vec<KeyValue>> {
    let path = dir.join(intermediate_file_name(map_id, reduce_id));
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let kv: KeyValue = serde_json::from_str(&line).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("error al parsear intermedio {}: {e}", path.display()),
            )
        })?;
        out.push(kv);
    }

    Ok(out)
}

/// Escribe la salida final del reduce `reduce_id`, en el orden recibido.
pub fn write_output(dir: &Path, reduce_id: TaskId, pairs: &[KeyValue]) -> io::Result<PathBuf> {
    write_atomically(dir, &output_file_name(reduce_id), |w| {
        for kv in pairs {
            writeln!(w, "{} {}", kv.key, kv.value)?;
        }
        Ok(())
    })
}

/// Lee un archivo de salida `"<clave> <valor>"` línea por línea.
pub fn read_output(path: &Path) -> io::Result<Vec<KeyValue>> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        out.push(KeyValue::new(key, value));
    }

    Ok(out)
}
