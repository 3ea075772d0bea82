//! End-to-end test of the RPC WebSocket over a real listener.

mod common;

use std::collections::HashMap;

use futures::{SinkExt, StreamExt};
use iotm_api::router::build_rpc_router;
use iotm_api::rpc::socket::MAX_IN_FLIGHT_FRAMES;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Serve the RPC router on an ephemeral port and connect one client.
async fn connect() -> (Client, JoinHandle<()>) {
    let state = common::test_state(common::test_config()).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, build_rpc_router(state)).await.unwrap();
    });

    let (socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/rpc"))
        .await
        .unwrap();
    (socket, server)
}

/// Read text frames until `count` replies have arrived, keyed by id.
async fn collect_replies(socket: &mut Client, count: usize) -> HashMap<i64, Value> {
    let mut replies = HashMap::new();
    while replies.len() < count {
        match socket.next().await.unwrap().unwrap() {
            Message::Text(text) => {
                let reply: Value = serde_json::from_str(&text).unwrap();
                replies.insert(reply["id"].as_i64().unwrap(), reply);
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }
    replies
}

// ---------------------------------------------------------------------------
// Test: pipelined frames are answered and matched by id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pipelined_frames_each_get_a_reply() {
    let (mut socket, server) = connect().await;

    let frames = [
        json!({"id": 1, "method": "get_alerts", "params": {"device_id": "a"}}),
        json!({"id": 2, "method": "get_alerts", "params": {"device_id": "b"}}),
        json!({"id": 3, "method": "no_such_method"}),
    ];
    for frame in &frames {
        socket.send(Message::Text(frame.to_string())).await.unwrap();
    }

    // Replies may arrive in any order; match them up by id.
    let replies = collect_replies(&mut socket, frames.len()).await;

    assert_eq!(replies[&1]["result"]["data"], json!([]));
    assert_eq!(replies[&2]["result"]["success"], true);
    assert_eq!(replies[&3]["error"]["code"], "method_not_found");

    socket.close(None).await.unwrap();
    server.abort();
}

// ---------------------------------------------------------------------------
// Test: a burst beyond the in-flight cap is throttled, not dropped
// ---------------------------------------------------------------------------

#[tokio::test]
async fn frames_beyond_in_flight_cap_are_still_answered() {
    let (mut socket, server) = connect().await;

    let total = MAX_IN_FLIGHT_FRAMES * 3;
    for id in 0..total {
        let frame = json!({
            "id": id,
            "method": "get_alerts",
            "params": {"device_id": format!("device-{id}")},
        });
        socket.send(Message::Text(frame.to_string())).await.unwrap();
    }

    let replies = collect_replies(&mut socket, total).await;
    for id in 0..total as i64 {
        assert_eq!(replies[&id]["result"]["success"], true, "reply {id}");
    }

    socket.close(None).await.unwrap();
    server.abort();
}
