use crate::app::MapReduceApp;
use crate::kv::KeyValue;

/// Normaliza un texto en tokens: sólo alfanuméricos y '_', en minúscula.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|raw| {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();

        (!cleaned.is_empty()).then_some(cleaned)
    })
}

/// WordCount: map emite `(palabra, "1")`, reduce devuelve el conteo.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCount;

impl MapReduceApp for WordCount {
    fn map(&self, _input_id: &str, content: &str) -> Vec<KeyValue> {
        tokenize(content).map(|w| KeyValue::new(w, "1")).collect()
    }

    fn reduce(&self, _key: &str, values: &[String]) -> String {
        values.len().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Caso feliz: texto normal, mayúsculas, signos, etc.
    #[test]
    fn map_emits_one_pair_per_normalized_word() {
        let pairs = WordCount.map("input.txt", "Hola hola, mundo!!\nmundo   mundo_prueba\n");
        let keys: Vec<&str> = pairs.iter().map(|kv| kv.key.as_str()).collect();

        assert_eq!(keys, vec!["hola", "hola", "mundo", "mundo", "mundo_prueba"]);
        assert!(pairs.iter().all(|kv| kv.value == "1"));
    }

    #[test]
    fn map_on_empty_input_emits_nothing() {
        assert!(WordCount.map("empty.txt", "").is_empty());
        assert!(WordCount.map("punct.txt", "!! ?? --").is_empty());
    }

    #[test]
    fn reduce_counts_values() {
        let values = vec!["1".to_string(); 3];
        assert_eq!(WordCount.reduce("hola", &values), "3");
    }
}
