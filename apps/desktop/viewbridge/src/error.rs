use common::ErrorLocation;

use thiserror::Error;

/// Errors raised by the host application itself. Failures inside the bridge
/// stack carry their own types and are logged where they surface.
#[derive(Debug, Error)]
pub enum ViewbridgeError {
    /// Startup wiring failures (directories, catalog construction)
    #[error("Viewbridge Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Logger initialization failures
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}
