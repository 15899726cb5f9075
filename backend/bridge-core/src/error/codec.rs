use common::ErrorLocation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// An image block failed validation: bad base64, truncated bytes, or a
    /// byte length that disagrees with the declared dimensions.
    #[error("Malformed Payload Error: {message} {location}")]
    MalformedPayload {
        message: String,
        location: ErrorLocation,
    },
}
