//! Self-describing binary image blocks.

use crate::error::codec::CodecError;
use crate::viewer::ImageFrame;

use common::ErrorLocation;

use std::panic::Location;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// The only pixel encoding currently produced: tightly packed raw bytes,
/// row-major, base64 over the wire.
pub const RAW_ENCODING: &str = "raw";

/// Wire form of a raster payload (screenshots, extracted layer data).
///
/// `byte_len` is the decoded pixel byte count and must equal
/// `width * height * channels`; decoding rejects any disagreement so a
/// truncated or tampered block never silently yields a skewed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub encoding: String,
    pub byte_len: usize,
    pub data: String,
}

impl ImageBlock {
    /// Encode pixel bytes once. Fails when the buffer does not match the
    /// declared dimensions.
    pub fn from_pixels(
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
    ) -> Result<Self, CodecError> {
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(CodecError::MalformedPayload {
                message: format!(
                    "pixel buffer holds {} bytes, {width}x{height}x{channels} needs {expected}",
                    pixels.len()
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            encoding: String::from(RAW_ENCODING),
            byte_len: pixels.len(),
            data: BASE64.encode(pixels),
        })
    }

    pub fn from_frame(frame: &ImageFrame) -> Result<Self, CodecError> {
        Self::from_pixels(frame.width, frame.height, frame.channels, &frame.pixels)
    }

    /// Decode back to pixel bytes, rejecting malformed blocks.
    pub fn to_pixels(&self) -> Result<Vec<u8>, CodecError> {
        if self.encoding != RAW_ENCODING {
            return Err(CodecError::MalformedPayload {
                message: format!("unsupported pixel encoding '{}'", self.encoding),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let pixels = BASE64
            .decode(&self.data)
            .map_err(|e| CodecError::MalformedPayload {
                message: format!("invalid base64 pixel data: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if pixels.len() != self.byte_len {
            return Err(CodecError::MalformedPayload {
                message: format!(
                    "truncated pixel data: declared {} bytes, decoded {}",
                    self.byte_len,
                    pixels.len()
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if pixels.len() != expected {
            return Err(CodecError::MalformedPayload {
                message: format!(
                    "{} bytes disagree with {}x{}x{} dimensions",
                    pixels.len(),
                    self.width,
                    self.height,
                    self.channels
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(pixels)
    }
}
