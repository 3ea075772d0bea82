//! Request/response client for the RPC WebSocket.

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::LoadError;
use crate::report::Outcome;

/// One connection per simulated device. Calls are issued one at a time,
/// so the next text frame carrying our id is the reply.
pub struct RpcClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_id: u64,
}

impl RpcClient {
    pub async fn connect(url: &str) -> Result<Self, LoadError> {
        let (socket, _response) = connect_async(url).await?;
        Ok(Self { socket, next_id: 1 })
    }

    /// Send one request and wait for the frame answering it.
    pub async fn call(&mut self, method: &str, params: Value) -> Result<Value, LoadError> {
        let id = self.next_id;
        self.next_id += 1;

        let frame = json!({ "id": id, "method": method, "params": params });
        self.socket
            .send(Message::Text(serde_json::to_string(&frame)?))
            .await?;

        while let Some(msg) = self.socket.next().await {
            match msg? {
                Message::Text(text) => {
                    let reply: Value = serde_json::from_str(&text)?;
                    if reply.get("id").and_then(Value::as_u64) == Some(id) {
                        return Ok(reply);
                    }
                    tracing::debug!(id, "Ignoring reply for another request");
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        Err(LoadError::ConnectionClosed(id))
    }

    pub async fn post_metric(
        &mut self,
        device_id: &str,
        timestamp: chrono::DateTime<chrono::Utc>,
        temperature: f64,
        battery: f64,
    ) -> Result<Outcome, LoadError> {
        let params = json!({
            "device_id": device_id,
            "metric": {
                "timestamp": timestamp,
                "temperature": temperature,
                "battery": battery,
            },
        });
        let reply = self.call("post_metrics", params).await?;
        Ok(Outcome::from_rpc(&reply))
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}
