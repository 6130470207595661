use serde::{Deserialize, Serialize};

/// Par clave/valor que fluye del map al reduce.
/// Los nombres de campo en JSON son `Key` y `Value`, igual que en los
/// archivos intermedios que leen otras herramientas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordena por clave (sort estable) y agrupa claves consecutivas iguales.
/// Los valores de cada grupo conservan el orden relativo de entrada.
pub fn sort_and_group(mut pairs: Vec<KeyValue>) -> Vec<(String, Vec<String>)> {
    pairs.sort_by(|a, b| a.key.cmp(&b.key));

    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for kv in pairs {
        match groups.last_mut() {
            Some((key, values)) if *key == kv.key => values.push(kv.value),
            _ => groups.push((kv.key, vec![kv.value])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_and_group_keeps_value_order_within_key() {
        let pairs = vec![
            KeyValue::new("b", "1"),
            KeyValue::new("a", "x"),
            KeyValue::new("b", "2"),
            KeyValue::new("a", "y"),
            KeyValue::new("c", "z"),
        ];

        let groups = sort_and_group(pairs);

        assert_eq!(
            groups,
            vec![
                ("a".to_string(), vec!["x".to_string(), "y".to_string()]),
                ("b".to_string(), vec!["1".to_string(), "2".to_string()]),
                ("c".to_string(), vec!["z".to_string()]),
            ]
        );
    }

    #[test]
    fn sort_and_group_on_empty_input() {
        assert!(sort_and_group(Vec::new()).is_empty());
    }

    #[test]
    fn key_value_uses_capitalized_json_fields() {
        let line = serde_json::to_string(&KeyValue::new("hola", "1")).unwrap();
        assert_eq!(line, r#"{"Key":"hola","Value":"1"}"#);
    }
}
