use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listen socket failed, most often because the address is
    /// already in use. Reported to the operator; never a crash.
    #[error("Bind Error: {address}: {message} {location}")]
    Bind {
        address: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },

    /// The client went away while a response was outstanding. The network
    /// side waiter is discarded; GUI-thread work already scheduled runs to
    /// completion.
    #[error("Connection Lost Error: {message} {location}")]
    ConnectionLost {
        message: String,
        location: ErrorLocation,
    },

    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },
}

impl From<IoError> for ServerError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ServerError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
