use mr_common::config::{coordinator_addr, env_or};
use std::time::Duration;

pub const DEFAULT_LEASE_SECS: u64 = 20;
pub const DEFAULT_SWEEP_SECS: u64 = 40;
pub const DEFAULT_DONE_POLL_MS: u64 = 1000;
pub const DEFAULT_FINISH_GRACE_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Dirección donde se hace bind (`MR_COORDINATOR_ADDR`).
    pub addr: String,
    /// Duración del lease de cada asignación (`MR_LEASE_SECS`).
    pub lease: Duration,
    /// Cada cuánto corre el barrido de leases (`MR_SWEEP_SECS`).
    pub sweep_interval: Duration,
    /// Cada cuánto se consulta si el job terminó (`MR_DONE_POLL_MS`).
    pub done_poll: Duration,
    /// Tiempo que se sigue atendiendo tras terminar, para que los workers
    /// reciban `Finish` (`MR_FINISH_GRACE_MS`).
    pub finish_grace: Duration,
}

impl CoordinatorConfig {
    pub fn from_env() -> Self {
        Self {
            addr: coordinator_addr(),
            lease: Duration::from_secs(env_or("MR_LEASE_SECS", DEFAULT_LEASE_SECS).max(1)),
            // con intervalo cero los loops de barrido y de fin girarían sin dormir
            sweep_interval: Duration::from_secs(env_or("MR_SWEEP_SECS", DEFAULT_SWEEP_SECS).max(1)),
            done_poll: Duration::from_millis(env_or("MR_DONE_POLL_MS", DEFAULT_DONE_POLL_MS).max(1)),
            finish_grace: Duration::from_millis(env_or("MR_FINISH_GRACE_MS", DEFAULT_FINISH_GRACE_MS)),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            addr: mr_common::config::DEFAULT_COORDINATOR_ADDR.to_string(),
            lease: Duration::from_secs(DEFAULT_LEASE_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_SECS),
            done_poll: Duration::from_millis(DEFAULT_DONE_POLL_MS),
            finish_grace: Duration::from_millis(DEFAULT_FINISH_GRACE_MS),
        }
    }
}
