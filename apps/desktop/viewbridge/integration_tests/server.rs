use viewbridge::state::{AppState, StateCommand};

use bridge_core::gui::GuiBridge;
use bridge_core::registry::catalog;
use bridge_core::session::SessionController;
use bridge_core::viewer::Viewer;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

// ============================================================================
// Integration tests for state + bridge-core integration
// These test the host wiring: server lifecycle feeding application state
// ============================================================================

fn build_controller() -> SessionController {
    let registry = Arc::new(catalog::builtin().expect("catalog must build"));
    let bridge = GuiBridge::spawn(Viewer::default());
    SessionController::new(registry, bridge, Duration::from_secs(2))
}

/// **VALUE**: Tests the full host lifecycle: start the control server,
/// record its address in state, serve a real client, stop, clear state.
///
/// **WHY THIS MATTERS**: This is exactly what main() does between startup
/// and shutdown. If the controller's address cannot be stored and read back,
/// or the stopped server keeps its port, the host UI lies to the operator.
///
/// **BUG THIS CATCHES**: Would catch type mismatches between the crates,
/// the controller reporting an address it is not serving on, or stop
/// leaving the listener alive.
#[tokio::test]
async fn given_host_wiring_when_started_and_stopped_then_state_tracks_server() {
    // GIVEN: Fresh state and a full bridge stack
    let state = AppState::new();
    let mut controller = build_controller();

    // WHEN: Starting on an ephemeral port and recording the address
    let addr = controller
        .start("127.0.0.1", 0)
        .await
        .expect("server should start");
    state
        .update(StateCommand::SetListening(addr))
        .await
        .expect("state update should succeed");
    tokio::task::yield_now().await;

    // THEN: State reports the listening address
    assert_eq!(state.get_listening().await, Some(addr));

    // AND: A real client can ping the recorded address
    let stream = TcpStream::connect(addr)
        .await
        .expect("recorded address should accept connections");
    let (read_half, mut write_half) = stream.into_split();
    write_half
        .write_all(b"{\"type\":\"ping\",\"id\":1}\n")
        .await
        .unwrap();
    let mut line = String::new();
    BufReader::new(read_half).read_line(&mut line).await.unwrap();
    assert!(line.contains("\"pong\""), "expected pong, got {line}");

    // WHEN: Stopping and clearing state
    drop(write_half);
    controller.stop().await;
    state
        .update(StateCommand::ClearListening)
        .await
        .expect("state update should succeed");
    tokio::task::yield_now().await;

    // THEN: State is idle and the port is released
    assert_eq!(state.get_listening().await, None);
    assert!(
        TcpStream::connect(addr).await.is_err(),
        "stopped server should not accept connections"
    );
}

/// **VALUE**: Tests that the controller refuses nothing on repeated start
/// and the state keeps the single real address.
///
/// **WHY THIS MATTERS**: The UI start button can be pressed twice; the
/// second press must not change the recorded address or open a socket.
#[tokio::test]
async fn given_running_host_when_started_again_then_single_address() {
    let state = AppState::new();
    let mut controller = build_controller();

    let first = controller.start("127.0.0.1", 0).await.unwrap();
    state
        .update(StateCommand::SetListening(first))
        .await
        .unwrap();

    let second = controller.start("127.0.0.1", 0).await.unwrap();
    state
        .update(StateCommand::SetListening(second))
        .await
        .unwrap();
    tokio::task::yield_now().await;

    assert_eq!(first, second);
    assert_eq!(state.get_listening().await, Some(first));

    controller.stop().await;
}
