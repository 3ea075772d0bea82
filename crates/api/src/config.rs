use std::str::FromStr;

use iotm_core::admission::AdmissionStore;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// An environment variable held a value that could not be used.
#[derive(Debug, thiserror::Error)]
#[error("{name} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address for both listeners (default: `0.0.0.0`).
    pub host: String,
    /// HTTP listener port (default: `1080`).
    pub http_port: u16,
    /// RPC listener port (default: `10801`). `0` disables the RPC front-end.
    pub rpc_port: u16,
    /// SQLite connection string (default: `sqlite://metrics.db`).
    pub database_url: String,
    /// Whether the admission gate is active (default: `true`).
    pub rate_limit_enabled: bool,
    /// Tokens per second for lazily created buckets (default: `10`).
    pub default_rate: f64,
    /// Capacity of lazily created buckets (default: `20`).
    pub default_burst: u32,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = lookup(name).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|_| ConfigError {
        name,
        value,
        expected,
    })
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default               |
    /// |------------------------|-----------------------|
    /// | `HOST`                 | `0.0.0.0`             |
    /// | `HTTP_PORT`            | `1080`                |
    /// | `RPC_PORT`             | `10801`               |
    /// | `DATABASE_URL`         | `sqlite://metrics.db` |
    /// | `RATE_LIMIT_ENABLED`   | `true`                |
    /// | `DEFAULT_RATE`         | `10`                  |
    /// | `DEFAULT_BURST`        | `20`                  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                  |
    /// | `LOG_FORMAT`           | `pretty`              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://metrics.db".into());

        let http_port = parse_var(&lookup, "HTTP_PORT", "1080", "a valid u16")?;
        let rpc_port = parse_var(&lookup, "RPC_PORT", "10801", "a valid u16")?;
        let rate_limit_enabled =
            parse_var(&lookup, "RATE_LIMIT_ENABLED", "true", "`true` or `false`")?;
        let default_rate: f64 =
            parse_var(&lookup, "DEFAULT_RATE", "10", "a finite non-negative number")?;
        let default_burst = parse_var(&lookup, "DEFAULT_BURST", "20", "a valid u32")?;
        let request_timeout_secs =
            parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "30", "a valid u64")?;
        let log_format = parse_var(&lookup, "LOG_FORMAT", "pretty", "`pretty` or `json`")?;

        if !default_rate.is_finite() || default_rate < 0.0 {
            return Err(ConfigError {
                name: "DEFAULT_RATE",
                value: default_rate.to_string(),
                expected: "a finite non-negative number",
            });
        }

        Ok(Self {
            host,
            http_port,
            rpc_port,
            database_url,
            rate_limit_enabled,
            default_rate,
            default_burst,
            request_timeout_secs,
            log_format,
        })
    }

    pub fn rpc_enabled(&self) -> bool {
        self.rpc_port != 0
    }

    /// The admission store implied by this configuration, if enabled.
    pub fn admission_store(&self) -> Option<AdmissionStore> {
        self.rate_limit_enabled
            .then(|| AdmissionStore::new(self.default_rate, self.default_burst))
    }
}
