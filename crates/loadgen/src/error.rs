/// Failures that abort a load run or a single device session.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{name} must be {expected}, got '{value}'")]
    Config {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("service unhealthy: {0}")]
    Unhealthy(String),

    #[error("RPC connection closed before reply {0}")]
    ConnectionClosed(u64),
}
