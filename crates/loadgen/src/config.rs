use std::str::FromStr;

use crate::error::LoadError;

/// Load run parameters.
///
/// | Variable      | Default                    |
/// |---------------|----------------------------|
/// | `DEVICES`     | `200`                      |
/// | `ROUNDS`      | `10`                       |
/// | `HTTP_URL`    | `http://127.0.0.1:1080`    |
/// | `RPC_URL`     | `ws://127.0.0.1:10801/rpc` |
/// | `CONCURRENCY` | `64`                       |
#[derive(Debug, Clone, PartialEq)]
pub struct LoadConfig {
    /// Simulated devices, each with its own id.
    pub devices: usize,
    /// Metric posts per device, alternating HTTP and RPC.
    pub rounds: usize,
    pub http_url: String,
    pub rpc_url: String,
    /// Devices driven at the same time.
    pub concurrency: usize,
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, LoadError> {
    let value = lookup(name).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|_| LoadError::Config {
        name,
        value,
        expected,
    })
}

impl LoadConfig {
    pub fn from_env() -> Result<Self, LoadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoadError> {
        let concurrency: usize = parse_var(&lookup, "CONCURRENCY", "64", "a positive integer")?;
        if concurrency == 0 {
            return Err(LoadError::Config {
                name: "CONCURRENCY",
                value: "0".into(),
                expected: "a positive integer",
            });
        }

        Ok(Self {
            devices: parse_var(&lookup, "DEVICES", "200", "a non-negative integer")?,
            rounds: parse_var(&lookup, "ROUNDS", "10", "a non-negative integer")?,
            http_url: lookup("HTTP_URL")
                .unwrap_or_else(|| "http://127.0.0.1:1080".into())
                .trim_end_matches('/')
                .to_string(),
            rpc_url: lookup("RPC_URL").unwrap_or_else(|| "ws://127.0.0.1:10801/rpc".into()),
            concurrency,
        })
    }
}
