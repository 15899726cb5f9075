use crate::error::viewer::ViewerError;

use common::ErrorLocation;

use thiserror::Error;

/// Failures of the network-to-GUI handoff itself, as opposed to domain
/// failures raised inside a handler (those ride in [`BridgeError::Execution`]).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The deadline elapsed before the GUI thread completed the task. The
    /// queued task is not aborted; its late completion is discarded.
    #[error("Timeout Error: '{operation}' did not complete within {timeout_ms} ms {location}")]
    Timeout {
        operation: String,
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Execution Error: '{operation}': {source} {location}")]
    Execution {
        operation: String,
        #[source]
        source: ViewerError,
        location: ErrorLocation,
    },

    /// The GUI event loop is gone. Only happens during host shutdown.
    #[error("Bridge Closed Error: {message} {location}")]
    Closed {
        message: String,
        location: ErrorLocation,
    },
}
