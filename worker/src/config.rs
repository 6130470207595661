use mr_common::config::{coordinator_base_url, env_millis, env_or};
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_WAIT_MS: u64 = 100;
pub const DEFAULT_REPORT_RETRIES: u32 = 3;
pub const DEFAULT_MAX_POLL_FAILURES: u32 = 100;

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// URL base del coordinador (derivada de `MR_COORDINATOR_ADDR`).
    pub coordinator_url: String,
    /// Directorio compartido para intermedios y salidas (`MR_WORK_DIR`).
    pub work_dir: PathBuf,
    /// Espera tras un `Wait` o una llamada fallida (`MR_WAIT_MS`).
    pub wait_interval: Duration,
    /// Intentos de ReportTask antes de abandonar (`MR_REPORT_RETRIES`).
    pub report_retries: u32,
    /// GetTask fallidos seguidos tras los cuales se asume que el
    /// coordinador terminó y se fue (`MR_MAX_POLL_FAILURES`).
    pub max_poll_failures: u32,
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        Self {
            coordinator_url: coordinator_base_url(),
            work_dir: env::var("MR_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            wait_interval: env_millis("MR_WAIT_MS", DEFAULT_WAIT_MS),
            report_retries: env_or("MR_REPORT_RETRIES", DEFAULT_REPORT_RETRIES).max(1),
            max_poll_failures: env_or("MR_MAX_POLL_FAILURES", DEFAULT_MAX_POLL_FAILURES).max(1),
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            coordinator_url: format!("http://{}", mr_common::config::DEFAULT_COORDINATOR_ADDR),
            work_dir: PathBuf::from("."),
            wait_interval: Duration::from_millis(DEFAULT_WAIT_MS),
            report_retries: DEFAULT_REPORT_RETRIES,
            max_poll_failures: DEFAULT_MAX_POLL_FAILURES,
        }
    }
}
