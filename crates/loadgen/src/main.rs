//! `iotm-loadgen` -- drives a running `iotm-api` with simulated devices.
//!
//! # Environment variables
//!
//! | Variable      | Default                    | Description                        |
//! |---------------|----------------------------|------------------------------------|
//! | `DEVICES`     | `200`                      | Simulated devices                  |
//! | `ROUNDS`      | `10`                       | Metric posts per device            |
//! | `HTTP_URL`    | `http://127.0.0.1:1080`    | HTTP front-end base URL            |
//! | `RPC_URL`     | `ws://127.0.0.1:10801/rpc` | RPC WebSocket endpoint             |
//! | `CONCURRENCY` | `64`                       | Devices driven at the same time    |

use iotm_loadgen::config::LoadConfig;
use iotm_loadgen::run;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iotm_loadgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LoadConfig::from_env()?;

    tracing::info!(
        devices = config.devices,
        rounds = config.rounds,
        concurrency = config.concurrency,
        http_url = %config.http_url,
        rpc_url = %config.rpc_url,
        "Starting iotm-loadgen",
    );

    let summary = run::run(&config).await?;

    tracing::info!(
        throughput = summary.throughput(),
        "{summary}",
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
