// Unit tests for the result codec: payload tagging and image blocks

use crate::codec::{ImageBlock, Payload};
use crate::error::codec::CodecError;

use serde_json::json;

/// **VALUE**: Verifies an image buffer survives encode/decode exactly.
///
/// **WHY THIS MATTERS**: Screenshots are how a remote client sees the
/// viewer. A codec that flips a byte or loses a row makes that view lie.
///
/// **BUG THIS CATCHES**: Would catch base64 misuse or a dimensions/length
/// bookkeeping error in either direction.
#[test]
fn given_image_buffer_when_round_tripped_then_identical() {
    let pixels: Vec<u8> = (0..=255).cycle().take(5 * 4 * 3).map(|v| v as u8).collect();

    let block = ImageBlock::from_pixels(5, 4, 3, &pixels).expect("encode should succeed");
    let decoded = block.to_pixels().expect("decode should succeed");

    assert_eq!(block.width, 5);
    assert_eq!(block.height, 4);
    assert_eq!(block.channels, 3);
    assert_eq!(block.byte_len, pixels.len());
    assert_eq!(decoded, pixels, "pixel bytes must survive the round trip");
}

/// **VALUE**: Verifies encoding refuses a buffer that disagrees with the
/// declared dimensions.
#[test]
fn given_short_buffer_when_encoded_then_malformed_payload_error() {
    let result = ImageBlock::from_pixels(8, 8, 4, &[0u8; 16]);

    assert!(
        matches!(result, Err(CodecError::MalformedPayload { .. })),
        "expected MalformedPayload, got {result:?}"
    );
}

/// **VALUE**: Verifies decoding rejects tampered or truncated blocks.
///
/// **WHY THIS MATTERS**: The block is self-describing; its declared
/// dimensions are only trustworthy because decode cross-checks them against
/// the actual byte count. A truncated block must never silently produce a
/// skewed image.
///
/// **BUG THIS CATCHES**: Would catch decode skipping the byte_len or
/// dimension cross-checks, or swallowing base64 errors.
#[test]
fn given_malformed_block_when_decoded_then_rejected() {
    let block = ImageBlock::from_pixels(2, 2, 4, &[7u8; 16]).unwrap();

    let mut bad_base64 = block.clone();
    bad_base64.data = String::from("@@not-base64@@");
    assert!(matches!(
        bad_base64.to_pixels(),
        Err(CodecError::MalformedPayload { .. })
    ));

    let mut truncated = block.clone();
    truncated.byte_len = 12;
    assert!(matches!(
        truncated.to_pixels(),
        Err(CodecError::MalformedPayload { .. })
    ));

    let mut skewed = block.clone();
    skewed.width = 3;
    skewed.byte_len = 16;
    assert!(matches!(
        skewed.to_pixels(),
        Err(CodecError::MalformedPayload { .. })
    ));

    let mut unknown_encoding = block;
    unknown_encoding.encoding = String::from("png");
    assert!(matches!(
        unknown_encoding.to_pixels(),
        Err(CodecError::MalformedPayload { .. })
    ));
}

/// **VALUE**: Verifies the wire shape of tagged payloads.
///
/// **WHY THIS MATTERS**: Remote clients are written against this exact JSON
/// shape; an accidental serde attribute change is a protocol break.
#[test]
fn given_payloads_when_serialized_then_tagged_shape_is_stable() {
    assert_eq!(
        serde_json::to_value(Payload::Int(3)).unwrap(),
        json!({"type": "int", "value": 3})
    );
    assert_eq!(
        serde_json::to_value(Payload::Null).unwrap(),
        json!({"type": "null"})
    );
    assert_eq!(
        serde_json::to_value(Payload::record([("zoom", Payload::Float(1.5))])).unwrap(),
        json!({"type": "record", "value": {"zoom": {"type": "float", "value": 1.5}}})
    );

    let wire = json!({"type": "list", "value": [{"type": "text", "value": "cells"}]});
    let parsed: Payload = serde_json::from_value(wire).unwrap();
    assert_eq!(parsed, Payload::List(vec![Payload::text("cells")]));
}
