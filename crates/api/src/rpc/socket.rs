use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Semaphore};

use super::dispatch::dispatch_frame;
use crate::state::AppState;

/// Outbound frames buffered per connection before dispatch tasks wait.
const OUTBOUND_BUFFER: usize = 256;

/// Frames dispatched concurrently on one connection. Once reached, the
/// socket is not read again until a dispatch finishes.
pub const MAX_IN_FLIGHT_FRAMES: usize = 32;

/// GET /rpc -- upgrades the connection to the RPC WebSocket.
pub async fn rpc_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single RPC connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Spawns a writer task that owns the sink.
///   2. Dispatches every inbound text frame on its own task, so one slow
///      call never blocks the calls behind it. At most
///      [`MAX_IN_FLIGHT_FRAMES`] run at once per connection.
///   3. Stops the writer once the stream ends and in-flight replies drain.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "RPC connection opened");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_BUFFER);
    let in_flight = Arc::new(Semaphore::new(MAX_IN_FLIGHT_FRAMES));

    // Writer task: the only place that touches the sink.
    let writer_conn_id = conn_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %writer_conn_id, "RPC sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let Ok(permit) = Arc::clone(&in_flight).acquire_owned().await else {
                    break;
                };
                let state = state.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    let reply = dispatch_frame(&state, text.as_str()).await;
                    match serde_json::to_string(&reply) {
                        Ok(json) => {
                            let _ = tx.send(Message::Text(json.into())).await;
                        }
                        Err(e) => tracing::error!(error = %e, "Failed to serialize RPC reply"),
                    }
                });
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(conn_id = %conn_id, "Ignoring binary RPC frame");
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "RPC receive error");
                break;
            }
        }
    }

    // Dropping our sender lets the writer finish once every dispatch task
    // has sent its reply.
    drop(tx);
    let _ = writer.await;
    tracing::info!(conn_id = %conn_id, "RPC connection closed");
}
