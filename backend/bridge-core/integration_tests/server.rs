use crate::helpers::{INVOKE_TIMEOUT, TestClient, args, start_test_server};

use bridge_core::codec::Payload;
use bridge_core::error::server::ServerError;
use bridge_core::gui::GuiBridge;
use bridge_core::protocol::{ErrorCode, Response};
use bridge_core::registry::catalog;
use bridge_core::session::SessionController;
use bridge_core::viewer::Viewer;

use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpStream;

/// **VALUE**: Verifies the liveness probe round-trips over a real socket.
///
/// **WHY THIS MATTERS**: Clients ping before issuing operations to tell
/// "server absent" apart from "operation slow". The probe must be answered
/// inline without touching the GUI thread.
///
/// **BUG THIS CATCHES**: Would catch a broken request decode path, a broken
/// response encode path, or ping being routed through the bridge.
#[tokio::test]
async fn given_running_server_when_pinged_then_pong_with_matching_id() {
    // GIVEN: full stack on an ephemeral port
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    // WHEN: sending a liveness probe
    let response = client.ping(42).await;

    // THEN: a pong correlated by id comes back
    assert!(
        matches!(response, Response::Pong { id: 42 }),
        "expected pong 42, got {response:?}"
    );
}

/// **VALUE**: Verifies an unknown operation produces a structured error and
/// the connection keeps serving.
///
/// **WHY THIS MATTERS**: One bad call must cost the client one error
/// response, never the session.
#[tokio::test]
async fn given_unknown_operation_when_called_then_error_and_connection_survives() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    // WHEN: calling an operation that does not exist
    let response = client.call(1, "no_such_op", args(json!({}))).await;

    // THEN: a correlated unknown_operation error
    let (id, error) = match response {
        Response::Error { id, error } => (id, error),
        other => panic!("expected error response, got {other:?}"),
    };
    assert_eq!(id, 1);
    assert_eq!(error.code, ErrorCode::UnknownOperation);

    // AND: the same connection still answers
    let response = client.ping(2).await;
    assert!(matches!(response, Response::Pong { id: 2 }));
}

/// **VALUE**: Verifies a non-JSON line is answered with a malformed-payload
/// error (id 0, no request id is recoverable) without dropping the session.
///
/// **BUG THIS CATCHES**: Would catch the server treating a decode failure as
/// a connection error and hanging up.
#[tokio::test]
async fn given_malformed_line_when_sent_then_error_id_zero_and_connection_survives() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    // WHEN: sending bytes that are not a request
    client.send_line("this is not json").await;
    let response = client.read_response().await;

    // THEN: malformed_payload with the sentinel id
    let (id, error) = match response {
        Response::Error { id, error } => (id, error),
        other => panic!("expected error response, got {other:?}"),
    };
    assert_eq!(id, 0);
    assert_eq!(error.code, ErrorCode::MalformedPayload);

    // AND: a well-formed call on the same connection succeeds
    let response = client.call(3, "list_layers", args(json!({}))).await;
    assert!(matches!(response, Response::Ok { id: 3, .. }));
}

/// **VALUE**: Verifies an invalid call is rejected at validation and viewer
/// state is untouched.
///
/// **WHY THIS MATTERS**: This is the end-to-end contract for bad arguments:
/// set_camera with a negative zoom fails as invalid_arguments and a
/// following get_camera reports the zoom unchanged.
///
/// **BUG THIS CATCHES**: Would catch validation happening after dispatch, or
/// the handler applying fields before rejecting.
#[tokio::test]
async fn given_negative_zoom_when_set_camera_then_invalid_arguments_and_state_unchanged() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    // WHEN: calling set_camera with a negative zoom
    let response = client.call(1, "set_camera", args(json!({"zoom": -1}))).await;

    // THEN: invalid_arguments with a per-parameter detail
    let (id, error) = match response {
        Response::Error { id, error } => (id, error),
        other => panic!("expected error response, got {other:?}"),
    };
    assert_eq!(id, 1);
    assert_eq!(error.code, ErrorCode::InvalidArguments);
    assert!(
        error.details.iter().any(|d| d.contains("zoom")),
        "details should name the offending parameter: {:?}",
        error.details
    );

    // AND: the camera still reports the default zoom
    let response = client.call(2, "get_camera", args(json!({}))).await;
    let record = match response {
        Response::Ok {
            payload: Payload::Record(record),
            ..
        } => record,
        other => panic!("expected camera record, got {other:?}"),
    };
    assert_eq!(record.get("zoom"), Some(&Payload::Float(1.0)));
}

/// **VALUE**: Verifies binding an occupied port fails with a bind error
/// instead of panicking or silently listening elsewhere.
#[tokio::test]
async fn given_occupied_port_when_starting_then_bind_error() {
    // GIVEN: a server holding a concrete port
    let (_controller, addr) = start_test_server().await;

    // WHEN: a second stack tries the same port
    let registry = Arc::new(catalog::builtin().expect("catalog must build"));
    let bridge = GuiBridge::spawn(Viewer::default());
    let mut second = SessionController::new(registry, bridge, INVOKE_TIMEOUT);
    let result = second.start("127.0.0.1", addr.port()).await;

    // THEN: a structured bind failure naming the address
    let address = match result {
        Err(ServerError::Bind { address, .. }) => address,
        other => panic!("expected Bind error, got {other:?}"),
    };
    assert!(address.ends_with(&addr.port().to_string()));
}

/// **VALUE**: Verifies start and stop are idempotent and stop releases the
/// bound address.
///
/// **WHY THIS MATTERS**: The host wires these to UI buttons; pressing
/// "start" twice must not open a second socket, and after "stop" the port
/// must actually be free of a listener.
#[tokio::test]
async fn given_running_server_when_started_again_then_same_address_and_stop_releases() {
    let (mut controller, addr) = start_test_server().await;

    // WHEN: starting again while listening
    let again = controller.start("127.0.0.1", 0).await.unwrap();

    // THEN: the existing address is reported, no second socket
    assert_eq!(again, addr);
    assert!(controller.is_running());

    // WHEN: stopping (twice; the second is a no-op)
    controller.stop().await;
    controller.stop().await;

    // THEN: the controller is idle and connecting fails
    assert!(!controller.is_running());
    assert_eq!(controller.local_addr(), None);
    assert!(
        TcpStream::connect(addr).await.is_err(),
        "stopped server must not accept connections"
    );
}
