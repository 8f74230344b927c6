//! Loopback WebSocket host standing in for the Painter plugin in tests.
//!
//! Each test provides a script that plays the remote end: read the frames
//! the bridge sends, answer them (in any order), push events, close.

// ============================================================================
// Imports
// ============================================================================

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// FakeHost
// ============================================================================

/// A spawned fake host: the URL to dial plus the script's join handle.
///
/// Await `handle` in tests whose assertions live inside the script.
pub(crate) struct FakeHost {
    pub(crate) url: String,
    pub(crate) handle: JoinHandle<()>,
}

/// Binds a loopback listener, runs `script` over the first accepted
/// WebSocket connection, and returns the URL to dial.
pub(crate) async fn spawn_host<F, Fut>(script: F) -> FakeHost
where
    F: FnOnce(HostSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    // RUST_LOG controls bridge-side tracing during test runs.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("host: bind");
    let port = listener.local_addr().expect("host: local addr").port();

    let handle = tokio::spawn(async move {
        let (stream, _addr) = listener.accept().await.expect("host: accept");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("host: websocket upgrade");
        script(HostSocket { ws }).await;
    });

    FakeHost {
        url: format!("ws://127.0.0.1:{port}"),
        handle,
    }
}

// ============================================================================
// HostSocket
// ============================================================================

/// The host side of one bridge connection.
pub(crate) struct HostSocket {
    ws: WebSocketStream<TcpStream>,
}

impl HostSocket {
    /// Receives the next text frame as parsed JSON.
    ///
    /// Panics if the connection ends first; use [`recv_close`](Self::recv_close)
    /// when the peer is expected to go away.
    pub(crate) async fn recv(&mut self) -> Value {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(&text).expect("host: frame is JSON");
                }
                Some(Ok(Message::Close(_))) | None => {
                    panic!("host: connection closed while expecting a frame")
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => panic!("host: websocket error: {e}"),
            }
        }
    }

    /// Drains frames until the peer closes or the stream ends.
    pub(crate) async fn recv_close(&mut self) {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(_)) => {}
            }
        }
    }

    /// Answers a received request with a result value.
    pub(crate) async fn reply(&mut self, request: &Value, result: Value) {
        let frame = json!({
            "jsonrpc": "2.0",
            "result": result,
            "id": request["id"].clone(),
        });
        self.send_raw(frame.to_string()).await;
    }

    /// Answers a received request with an error payload.
    pub(crate) async fn reply_error(&mut self, request: &Value, error: Value) {
        let frame = json!({
            "jsonrpc": "2.0",
            "error": error,
            "id": request["id"].clone(),
        });
        self.send_raw(frame.to_string()).await;
    }

    /// Pushes an uncorrelated event.
    pub(crate) async fn send_event(&mut self, method: &str, params: Value) {
        let frame = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
        });
        self.send_raw(frame.to_string()).await;
    }

    /// Sends a raw text frame, valid JSON or not.
    pub(crate) async fn send_raw(&mut self, text: String) {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .expect("host: send frame");
    }

    /// Closes the connection from the host side.
    pub(crate) async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
