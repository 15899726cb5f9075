// Unit tests for the GUI thread bridge

use crate::codec::Payload;
use crate::error::bridge::BridgeError;
use crate::error::viewer::ViewerError;
use crate::gui::GuiBridge;
use crate::registry::schema::ParamSchema;
use crate::registry::{Arguments, OperationDescriptor};
use crate::viewer::Viewer;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

fn descriptor(
    name: &'static str,
    handler: impl Fn(&mut Viewer, &Arguments) -> Result<Payload, ViewerError> + Send + Sync + 'static,
) -> Arc<OperationDescriptor> {
    Arc::new(OperationDescriptor::new(
        name,
        "test operation",
        ParamSchema::empty(),
        handler,
    ))
}

/// **VALUE**: Verifies a queued invocation executes on the viewer and its
/// payload comes back to the caller.
///
/// **WHY THIS MATTERS**: This is the crate's central seam; every remote call
/// crosses it.
#[tokio::test]
async fn given_invocation_when_executed_then_payload_returned() {
    let bridge = GuiBridge::spawn(Viewer::default());
    let op = descriptor("probe", |_viewer, _args| Ok(Payload::Int(7)));

    let result = bridge
        .invoke(op, Arguments::new(), Duration::from_secs(1))
        .await;

    assert_eq!(result.unwrap(), Payload::Int(7));
}

/// **VALUE**: Verifies handler failures surface as execution errors carrying
/// the operation name and the viewer error as source.
#[tokio::test]
async fn given_failing_handler_when_invoked_then_execution_error() {
    let bridge = GuiBridge::spawn(Viewer::default());
    let op = descriptor("broken", |_viewer, _args| {
        Err(ViewerError::InvalidValue {
            message: String::from("nope"),
            location: ErrorLocation::from(Location::caller()),
        })
    });

    let result = bridge
        .invoke(op, Arguments::new(), Duration::from_secs(1))
        .await;

    let operation = match result {
        Err(BridgeError::Execution { operation, .. }) => operation,
        other => panic!("expected Execution, got {other:?}"),
    };
    assert_eq!(operation, "broken");
}

/// **VALUE**: Verifies invocations execute in receipt order against shared
/// viewer state.
///
/// **BUG THIS CATCHES**: Would catch the queue being drained by more than
/// one thread or tasks being reordered.
#[tokio::test]
async fn given_sequential_invocations_when_executed_then_in_order() {
    let bridge = GuiBridge::spawn(Viewer::default());
    let add = descriptor("add_marker", |viewer, _args| {
        viewer.add_points(vec![vec![0.0, 0.0]], None)?;
        Ok(Payload::Null)
    });
    let count = descriptor("count_layers", |viewer, _args| {
        Ok(Payload::Int(viewer.layers().len() as i64))
    });

    for _ in 0..3 {
        bridge
            .invoke(add.clone(), Arguments::new(), Duration::from_secs(1))
            .await
            .unwrap();
    }
    let result = bridge
        .invoke(count, Arguments::new(), Duration::from_secs(1))
        .await;

    assert_eq!(result.unwrap(), Payload::Int(3));
}

/// **VALUE**: Verifies an elapsed deadline unblocks the caller and the loop
/// keeps serving later invocations.
///
/// **WHY THIS MATTERS**: A stalled handler must cost the client one timeout,
/// not the whole session. The late completion is discarded, not delivered to
/// the wrong caller.
///
/// **BUG THIS CATCHES**: Would catch the event loop dying on a consumed
/// completion slot, or the timeout never firing because the wait was not
/// bounded.
#[tokio::test]
async fn given_slow_handler_when_deadline_elapses_then_timeout_and_loop_survives() {
    let bridge = GuiBridge::spawn(Viewer::default());
    let slow = descriptor("slow", |_viewer, _args| {
        std::thread::sleep(Duration::from_millis(200));
        Ok(Payload::Null)
    });
    let quick = descriptor("quick", |_viewer, _args| Ok(Payload::Bool(true)));

    let result = bridge
        .invoke(slow, Arguments::new(), Duration::from_millis(20))
        .await;
    let (operation, timeout_ms) = match result {
        Err(BridgeError::Timeout {
            operation,
            timeout_ms,
            ..
        }) => (operation, timeout_ms),
        other => panic!("expected Timeout, got {other:?}"),
    };
    assert_eq!(operation, "slow");
    assert_eq!(timeout_ms, 20);

    // the queued slow task still runs to completion; the next call just
    // waits behind it
    let result = bridge
        .invoke(quick, Arguments::new(), Duration::from_secs(2))
        .await;
    assert_eq!(result.unwrap(), Payload::Bool(true));
}
