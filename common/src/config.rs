use std::{env, str::FromStr, time::Duration};

/// Dirección fija del coordinador si no se define `MR_COORDINATOR_ADDR`.
pub const DEFAULT_COORDINATOR_ADDR: &str = "127.0.0.1:7878";

/// Dirección donde escucha el coordinador.
/// El coordinador la usa para hacer bind una sola vez; workers y cliente
/// derivan el mismo valor para conectarse.
pub fn coordinator_addr() -> String {
    env::var("MR_COORDINATOR_ADDR").unwrap_or_else(|_| DEFAULT_COORDINATOR_ADDR.to_string())
}

/// URL base HTTP del coordinador, ej: `http://127.0.0.1:7878`.
pub fn coordinator_base_url() -> String {
    format!("http://{}", coordinator_addr())
}

/// Lee una variable de entorno numérica; si no existe o no parsea,
/// devuelve `default`.
pub fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn env_secs(name: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_or(name, default_secs))
}

pub fn env_millis(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_or(name, default_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_respects_env_var() {
        env::set_var("MR_TEST_ENV_OR_VALUE", "1234");
        assert_eq!(env_or("MR_TEST_ENV_OR_VALUE", 7_u32), 1234);
        env::remove_var("MR_TEST_ENV_OR_VALUE");
    }

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("MR_TEST_ENV_OR_MISSING", 7_u32), 7);

        env::set_var("MR_TEST_ENV_OR_GARBAGE", "veinte");
        assert_eq!(env_or("MR_TEST_ENV_OR_GARBAGE", 20_u64), 20);
        env::remove_var("MR_TEST_ENV_OR_GARBAGE");
    }

    #[test]
    fn duration_helpers_use_their_units() {
        env::set_var("MR_TEST_ENV_SECS", "3");
        assert_eq!(env_secs("MR_TEST_ENV_SECS", 1), Duration::from_secs(3));
        env::remove_var("MR_TEST_ENV_SECS");

        assert_eq!(env_millis("MR_TEST_ENV_MILLIS_MISSING", 100), Duration::from_millis(100));
    }
}
