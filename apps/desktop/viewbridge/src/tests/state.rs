// Unit tests for the state actor

use crate::state::{AppState, StateCommand};

use std::net::SocketAddr;

fn addr(port: u16) -> SocketAddr {
    format!("127.0.0.1:{port}").parse().unwrap()
}

/// **VALUE**: Verifies the set/read/clear cycle for the listening address.
///
/// **WHY THIS MATTERS**: The UI reads this state to show whether the control
/// server is up and where; stale state means the operator acts on a server
/// that is not there.
///
/// **BUG THIS CATCHES**: Would catch commands being dropped by the actor or
/// reads bypassing the shared lock.
#[tokio::test]
async fn given_state_when_set_and_cleared_then_reads_track_commands() {
    // GIVEN: Fresh state
    let state = AppState::new();
    assert_eq!(state.get_listening().await, None);

    // WHEN: Recording a listening address
    state
        .update(StateCommand::SetListening(addr(64908)))
        .await
        .unwrap();
    tokio::task::yield_now().await;

    // THEN: Reads observe it
    assert_eq!(state.get_listening().await, Some(addr(64908)));

    // WHEN: Clearing
    state.update(StateCommand::ClearListening).await.unwrap();
    tokio::task::yield_now().await;

    // THEN: Reads observe the idle state
    assert_eq!(state.get_listening().await, None);
}

/// **VALUE**: Verifies a second set replaces the first (server restarted on
/// a different port).
#[tokio::test]
async fn given_listening_state_when_set_again_then_replaced() {
    let state = AppState::new();

    state
        .update(StateCommand::SetListening(addr(64908)))
        .await
        .unwrap();
    state
        .update(StateCommand::SetListening(addr(50000)))
        .await
        .unwrap();
    tokio::task::yield_now().await;

    assert_eq!(state.get_listening().await, Some(addr(50000)));
}

/// **VALUE**: Verifies clones observe the same underlying state.
///
/// **BUG THIS CATCHES**: Would catch a clone deep-copying the lock instead
/// of sharing it.
#[tokio::test]
async fn given_cloned_state_when_one_updates_then_other_observes() {
    let state = AppState::new();
    let observer = state.clone();

    state
        .update(StateCommand::SetListening(addr(64908)))
        .await
        .unwrap();
    tokio::task::yield_now().await;

    assert_eq!(observer.get_listening().await, Some(addr(64908)));
}
