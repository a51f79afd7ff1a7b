//! Application-wide constants

pub const APP_ENV_VAR: &str = "APP_ENV";
pub const POSTGRES_CONN_VAR: &str = "POSTGRES_CONN";
pub const DEFAULT_APP_ENV: &str = "development";
pub const DEFAULT_APP_NAME: &str = "tender-service";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;
