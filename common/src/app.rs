use std::sync::Arc;

use crate::indexer::Indexer;
use crate::kv::KeyValue;
use crate::wordcount::WordCount;

/// Lógica de usuario que el worker ejecuta sin conocerla.
pub trait MapReduceApp: Send + Sync {
    /// `input_id` identifica la entrada (la ruta del archivo); `content`
    /// es el archivo completo.
    fn map(&self, input_id: &str, content: &str) -> Vec<KeyValue>;

    /// Se llama una vez por clave distinta con todos sus valores.
    fn reduce(&self, key: &str, values: &[String]) -> String;
}

/// Nombres aceptados por `app_by_name`.
pub const APP_NAMES: &[&str] = &["wordcount", "indexer"];

/// Busca una de las apps incluidas por nombre.
pub fn app_by_name(name: &str) -> Option<Arc<dyn MapReduceApp>> {
    match name {
        "wordcount" | "wc" => Some(Arc::new(WordCount)),
        "indexer" => Some(Arc::new(Indexer)),
        _ => None,
    }
}
