//! Loopback TCP server for the control protocol.
//!
//! Lifecycle is a small state machine:
//!
//! ```text
//! Idle -> Listening -> Connected -> (Listening | Idle)
//! ```
//!
//! - `Idle -> Listening`: explicit start; binds the configured loopback
//!   address (port 0 requests an ephemeral port) or fails with a bind error.
//! - `Listening -> Connected`: a client establishes the session. One primary
//!   session at a time; later connectors wait in the accept backlog.
//! - `Connected -> Listening`: client disconnect. Network-side waiters for
//!   in-flight work are discarded; scheduled GUI work still completes.
//! - `-> Idle`: explicit stop via [`ServerHandle::shutdown`]; closes the
//!   socket and releases the address.
//!
//! Per request: decode, validate against the registry (validation failures
//! become structured error responses immediately), invoke through the GUI
//! bridge with the configured deadline, respond. Requests on a connection
//! are serialized by design, which also yields in-order responses.

pub mod handle;

pub use handle::ServerHandle;

use crate::error::server::ServerError;
use crate::gui::GuiBridge;
use crate::protocol::{ErrorCode, Request, Response};
use crate::registry::{Arguments, OperationRegistry};

use common::ErrorLocation;

use std::panic::Location;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Bind the listen socket and start serving in a background task.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] when the address cannot be bound (most
/// often: already in use). The caller reports this to the operator; it never
/// crashes the host.
pub async fn start_server(
    host: &str,
    port: u16,
    registry: Arc<OperationRegistry>,
    bridge: GuiBridge,
    invoke_timeout: Duration,
) -> Result<ServerHandle, ServerError> {
    let address = format!("{host}:{port}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| ServerError::Bind {
            address: address.clone(),
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
    let local_addr = listener.local_addr()?;

    info!("Listening on {local_addr}");

    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(accept_loop(
        listener,
        registry,
        bridge,
        invoke_timeout,
        shutdown_rx,
    ));

    Ok(ServerHandle {
        local_addr,
        shutdown,
        task,
    })
}

async fn accept_loop(
    listener: TcpListener,
    registry: Arc<OperationRegistry>,
    bridge: GuiBridge,
    invoke_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let (stream, peer) = tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Accept failed: {e}");
                    continue;
                }
            },
        };

        if !peer.ip().is_loopback() {
            warn!("Rejected non-loopback connection from {peer}");
            continue;
        }

        info!("Client connected from {peer}");
        match serve_connection(
            stream,
            peer,
            &registry,
            &bridge,
            invoke_timeout,
            &mut shutdown,
        )
        .await
        {
            Ok(()) => info!("Client {peer} disconnected"),
            Err(e) => warn!("Session with {peer} ended: {e}"),
        }
    }

    info!("Server shut down");
}

/// Serve one connected session until the client disconnects or shutdown is
/// signalled.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    registry: &OperationRegistry,
    bridge: &GuiBridge,
    invoke_timeout: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<(), ServerError> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.changed() => return Ok(()),
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            return Ok(()); // clean EOF
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Err(e) => {
                warn!("Malformed request from {peer}: {e}");
                Response::error(
                    0,
                    ErrorCode::MalformedPayload,
                    format!("malformed request: {e}"),
                )
            }
            Ok(Request::Ping { id }) => Response::pong(id),
            Ok(Request::Call {
                id,
                name,
                arguments,
            }) => dispatch_call(id, &name, arguments, registry, bridge, invoke_timeout).await,
        };

        let mut encoded = serde_json::to_vec(&response).map_err(|e| ServerError::Protocol {
            message: format!("failed to encode response: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;
        encoded.push(b'\n');

        write_half
            .write_all(&encoded)
            .await
            .map_err(|e| ServerError::ConnectionLost {
                message: format!("{peer} went away before the response was sent: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }
}

/// Resolve one tool call to a response. Never returns an error: every
/// failure becomes a structured failure response.
async fn dispatch_call(
    id: u64,
    name: &str,
    arguments: Arguments,
    registry: &OperationRegistry,
    bridge: &GuiBridge,
    invoke_timeout: Duration,
) -> Response {
    let descriptor = match registry.validate(name, &arguments) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!("Rejected call '{name}': {e}");
            return Response::registry_failure(id, &e);
        }
    };

    match bridge.invoke(descriptor, arguments, invoke_timeout).await {
        Ok(payload) => Response::ok(id, payload),
        Err(e) => {
            warn!("Call '{name}' failed: {e}");
            Response::bridge_failure(id, &e)
        }
    }
}
