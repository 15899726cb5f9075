use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

/// Domain failures raised by viewer operation handlers.
///
/// These are caught by the GUI thread bridge and turned into structured
/// failure responses; they never tear down the server or leave the viewer
/// partially mutated (handlers validate before touching state).
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("File Not Found Error: {path} {location}")]
    FileNotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Layer Not Found Error: no layer named '{name}' {location}")]
    LayerNotFound {
        name: String,
        location: ErrorLocation,
    },

    #[error("Layer Index Error: index {index} out of range for {len} layers {location}")]
    LayerIndexOutOfRange {
        index: usize,
        len: usize,
        location: ErrorLocation,
    },

    #[error("Unsupported Layer Error: {message} {location}")]
    UnsupportedLayer {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Value Error: {message} {location}")]
    InvalidValue {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },

    #[error("Internal Error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl From<IoError> for ViewerError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ViewerError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
