use std::future::IntoFuture;
use std::net::SocketAddr;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iotm_api::config::{LogFormat, ServerConfig};
use iotm_api::router::{build_app_router, build_rpc_router};
use iotm_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "iotm_api=debug,iotm_core=info,iotm_db=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        host = %config.host,
        http_port = config.http_port,
        rpc_port = config.rpc_port,
        rate_limit_enabled = config.rate_limit_enabled,
        default_rate = config.default_rate,
        default_burst = config.default_burst,
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = iotm_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!(database_url = %config.database_url, "Database connection pool created");

    iotm_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    iotm_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- App state (shared by both front-ends) ---
    let state = AppState::new(pool.clone(), config.clone());

    // --- Shutdown signal ---
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let ip = config.host.parse().expect("Invalid HOST address");
    let mut servers = JoinSet::new();

    // --- HTTP front-end ---
    let http_addr = SocketAddr::new(ip, config.http_port);
    let http_listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .expect("Failed to bind HTTP address");
    tracing::info!(addr = %http_addr, "Starting HTTP server");
    let http_app = build_app_router(state.clone(), &config);
    let http_shutdown = shutdown.clone();
    servers.spawn(
        axum::serve(http_listener, http_app)
            .with_graceful_shutdown(async move { http_shutdown.cancelled().await })
            .into_future(),
    );

    // --- RPC front-end ---
    if config.rpc_enabled() {
        let rpc_addr = SocketAddr::new(ip, config.rpc_port);
        let rpc_listener = tokio::net::TcpListener::bind(rpc_addr)
            .await
            .expect("Failed to bind RPC address");
        tracing::info!(addr = %rpc_addr, "Starting RPC server");
        let rpc_app = build_rpc_router(state.clone());
        let rpc_shutdown = shutdown.clone();
        servers.spawn(
            axum::serve(rpc_listener, rpc_app)
                .with_graceful_shutdown(async move { rpc_shutdown.cancelled().await })
                .into_future(),
        );
    } else {
        tracing::info!("RPC front-end disabled (RPC_PORT=0)");
    }

    while let Some(joined) = servers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Server error");
                shutdown.cancel();
            }
            Err(e) => {
                tracing::error!(error = %e, "Server task failed");
                shutdown.cancel();
            }
        }
    }

    pool.close().await;
    tracing::info!("Server shut down");
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
