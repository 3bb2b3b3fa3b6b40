/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// Empty, or a `*` entry, mirrors the request origin so credentialed
    /// requests work from anywhere.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Interval between expired-session sweeps in seconds (default: `3600`).
    pub session_sweep_interval_secs: u64,
    /// Broadcast relay channel capacity (default: `1024`).
    pub relay_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default  |
    /// |-------------------------------|----------|
    /// | `HOST`                        | `0.0.0.0`|
    /// | `PORT`                        | `3000`   |
    /// | `CORS_ORIGINS`                | *(mirror)* |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`     |
    /// | `SESSION_SWEEP_INTERVAL_SECS` | `3600`   |
    /// | `RELAY_CAPACITY`              | `1024`   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_SWEEP_INTERVAL_SECS must be a valid u64");

        let relay_capacity: usize = std::env::var("RELAY_CAPACITY")
            .unwrap_or_else(|_| "1024".into())
            .parse()
            .expect("RELAY_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session_sweep_interval_secs,
            relay_capacity,
        }
    }
}
