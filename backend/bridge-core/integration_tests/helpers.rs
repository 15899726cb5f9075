//! Test helpers for protocol server integration tests.
//!
//! Each test spins up the full stack on an ephemeral loopback port: a viewer
//! behind its event-loop thread, the built-in catalog, and the TCP server.
//! The `TestClient` speaks the real wire protocol over a real socket.

use bridge_core::gui::GuiBridge;
use bridge_core::protocol::{Request, Response};
use bridge_core::registry::{Arguments, catalog};
use bridge_core::session::SessionController;
use bridge_core::viewer::Viewer;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// Deadline for one bridged invocation in tests.
pub const INVOKE_TIMEOUT: Duration = Duration::from_secs(2);

/// Deadline for reading one response line; generous so slow CI does not flake.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Start the full stack on an ephemeral port and return the controller
/// (keep it alive; dropping it does not stop the server) and bound address.
pub async fn start_test_server() -> (SessionController, SocketAddr) {
    let registry = Arc::new(catalog::builtin().expect("catalog must build"));
    let bridge = GuiBridge::spawn(Viewer::default());
    let mut controller = SessionController::new(registry, bridge, INVOKE_TIMEOUT);
    let addr = controller
        .start("127.0.0.1", 0)
        .await
        .expect("ephemeral port should bind");
    (controller, addr)
}

/// A wire-protocol client over a real TCP connection.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    /// Send one raw line, newline appended. Used to exercise malformed input.
    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(line.as_bytes())
            .await
            .expect("Failed to send line");
        self.writer
            .write_all(b"\n")
            .await
            .expect("Failed to send newline");
    }

    pub async fn send(&mut self, request: &Request) {
        let encoded = serde_json::to_string(request).expect("Failed to encode request");
        self.send_line(&encoded).await;
    }

    pub async fn read_response(&mut self) -> Response {
        let mut line = String::new();
        let read = tokio::time::timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for a response")
            .expect("Failed to read response line");
        assert!(read > 0, "Server closed the connection unexpectedly");
        serde_json::from_str(&line).expect("Failed to decode response")
    }

    /// Issue one tool call and wait for its response.
    pub async fn call(&mut self, id: u64, name: &str, arguments: Arguments) -> Response {
        self.send(&Request::Call {
            id,
            name: name.to_string(),
            arguments,
        })
        .await;
        self.read_response().await
    }

    pub async fn ping(&mut self, id: u64) -> Response {
        self.send(&Request::Ping { id }).await;
        self.read_response().await
    }
}

pub fn args(value: serde_json::Value) -> Arguments {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test arguments must be a JSON object"),
    }
}
