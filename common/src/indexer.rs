use std::collections::BTreeSet;

use crate::app::MapReduceApp;
use crate::kv::KeyValue;
use crate::wordcount::tokenize;

/// Índice invertido: para cada palabra, en qué entradas aparece.
/// Salida de reduce: `"<n> <entrada1>,<entrada2>,..."`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Indexer;

impl MapReduceApp for Indexer {
    fn map(&self, input_id: &str, content: &str) -> Vec<KeyValue> {
        // una sola emisión por palabra y documento
        let words: BTreeSet<String> = tokenize(content).collect();
        words
            .into_iter()
            .map(|w| KeyValue::new(w, input_id))
            .collect()
    }

    fn reduce(&self, _key: &str, values: &[String]) -> String {
        let docs: BTreeSet<&str> = values.iter().map(String::as_str).collect();
        let joined: Vec<&str> = docs.into_iter().collect();
        format!("{} {}", joined.len(), joined.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_emits_each_word_once_per_document() {
        let pairs = Indexer.map("a.txt", "uno dos uno");
        assert_eq!(
            pairs,
            vec![KeyValue::new("dos", "a.txt"), KeyValue::new("uno", "a.txt")]
        );
    }

    #[test]
    fn reduce_sorts_and_dedups_documents() {
        let values = vec!["b.txt".to_string(), "a.txt".to_string(), "b.txt".to_string()];
        assert_eq!(Indexer.reduce("uno", &values), "2 a.txt,b.txt");
    }
}
