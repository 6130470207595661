use glob::glob;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("reduce_task_count debe ser mayor que cero")]
    ZeroReduceTasks,
    #[error("patrón de entrada inválido {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("el patrón {0} no coincide con ningún archivo")]
    NoMatches(String),
}

/// Un job: archivos de entrada (uno por tarea map) y cantidad de reduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub input_files: Vec<String>,
    pub reduce_task_count: u32,
}

impl JobSpec {
    pub fn new(input_files: Vec<String>, reduce_task_count: u32) -> Result<Self, JobError> {
        if reduce_task_count == 0 {
            return Err(JobError::ZeroReduceTasks);
        }
        Ok(Self {
            input_files,
            reduce_task_count,
        })
    }

    /// Arma el job expandiendo patrones glob (ej: `data/pg-*.txt`).
    /// Un argumento sin metacaracteres se usa tal cual, exista o no: si no
    /// se puede leer, su tarea map se reintentará como cualquier otra falla.
    pub fn from_patterns(patterns: &[String], reduce_task_count: u32) -> Result<Self, JobError> {
        let mut input_files = Vec::new();

        for pattern in patterns {
            if !is_glob(pattern) {
                input_files.push(pattern.clone());
                continue;
            }

            let entries = glob(pattern).map_err(|e| JobError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

            let mut matched: Vec<String> = entries
                .flatten()
                .filter(|p| p.is_file())
                .map(|p| p.to_string_lossy().to_string())
                .collect();
            matched.sort();

            if matched.is_empty() {
                return Err(JobError::NoMatches(pattern.clone()));
            }
            input_files.extend(matched);
        }

        Self::new(input_files, reduce_task_count)
    }

    pub fn map_task_count(&self) -> u32 {
        self.input_files.len() as u32
    }
}

fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn zero_reduce_tasks_is_rejected() {
        let err = JobSpec::new(vec!["a.txt".into()], 0).unwrap_err();
        assert!(matches!(err, JobError::ZeroReduceTasks));
    }

    #[test]
    fn from_patterns_expands_globs_sorted_and_keeps_literals() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["pg-b.txt", "pg-a.txt", "otro.csv"] {
            fs::write(tmp.path().join(name), "x").unwrap();
        }
        let pattern = format!("{}/pg-*.txt", tmp.path().display());
        let literal = "no/existe.txt".to_string();

        let job = JobSpec::from_patterns(&[pattern, literal.clone()], 3).unwrap();

        assert_eq!(job.map_task_count(), 3);
        assert!(job.input_files[0].ends_with("pg-a.txt"));
        assert!(job.input_files[1].ends_with("pg-b.txt"));
        assert_eq!(job.input_files[2], literal);
        assert_eq!(job.reduce_task_count, 3);
    }

    #[test]
    fn glob_without_matches_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.nada", tmp.path().display());

        let err = JobSpec::from_patterns(&[pattern], 1).unwrap_err();
        assert!(matches!(err, JobError::NoMatches(_)));
    }

    #[test]
    fn malformed_glob_is_reported_with_its_pattern() {
        let err = JobSpec::from_patterns(&["data/[pg-*.txt".to_string()], 1).unwrap_err();
        match err {
            JobError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "data/[pg-*.txt"),
            other => panic!("error inesperado: {other:?}"),
        }
    }
}
