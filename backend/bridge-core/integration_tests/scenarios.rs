//! End-to-end scenarios: a wire client driving the viewer through the full
//! stack (socket, protocol, registry, GUI thread).

use crate::helpers::{TestClient, args, start_test_server};

use bridge_core::codec::Payload;
use bridge_core::protocol::{ErrorCode, Response};

use serde_json::json;

fn ok_payload(response: Response) -> Payload {
    match response {
        Response::Ok { payload, .. } => payload,
        other => panic!("expected ok response, got {other:?}"),
    }
}

/// **VALUE**: Verifies the baseline contract on a fresh viewer: listing
/// layers yields an empty list.
#[tokio::test]
async fn given_fresh_viewer_when_listing_layers_then_empty_list() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let payload = ok_payload(client.call(1, "list_layers", args(json!({}))).await);

    assert_eq!(payload, Payload::List(Vec::new()));
}

/// **VALUE**: Verifies the load-then-inspect flow a remote client starts
/// with: load a file, see it in the layer list with its source recorded.
///
/// **WHY THIS MATTERS**: This is the primary user journey; if the loaded
/// layer does not show up in list_layers, every subsequent styling call has
/// nothing to address.
///
/// **BUG THIS CATCHES**: Would catch the handler reporting success without
/// mutating the viewer, or the layer record dropping the source path.
#[tokio::test]
async fn given_existing_file_when_loaded_then_listed_with_source() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.tif");
    std::fs::write(&path, b"x").unwrap();
    let path_text = path.to_string_lossy().into_owned();

    // WHEN: loading the file
    let payload = ok_payload(
        client
            .call(1, "load_file", args(json!({"path": path_text})))
            .await,
    );
    let Payload::Record(record) = payload else {
        panic!("expected load_file record");
    };
    assert_eq!(record.get("layer"), Some(&Payload::text("cells")));

    // THEN: the layer list reports it with the source path
    let payload = ok_payload(client.call(2, "list_layers", args(json!({}))).await);
    let Payload::List(entries) = payload else {
        panic!("expected layer list");
    };
    assert_eq!(entries.len(), 1);
    let Payload::Record(entry) = &entries[0] else {
        panic!("expected layer record");
    };
    assert_eq!(entry.get("name"), Some(&Payload::text("cells")));
    assert_eq!(entry.get("kind"), Some(&Payload::text("image")));
    assert_eq!(entry.get("source"), Some(&Payload::text(path_text)));
}

/// **VALUE**: Verifies a missing file surfaces as an execution error, not a
/// protocol failure.
#[tokio::test]
async fn given_missing_file_when_loaded_then_execution_error() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let response = client
        .call(1, "load_file", args(json!({"path": "/no/such/file.tif"})))
        .await;

    let error = match response {
        Response::Error { error, .. } => error,
        other => panic!("expected error response, got {other:?}"),
    };
    assert_eq!(error.code, ErrorCode::ExecutionError);
    assert!(
        error.message.contains("/no/such/file.tif"),
        "message should name the path: {}",
        error.message
    );
}

/// **VALUE**: Verifies a screenshot arrives as a decodable image block whose
/// dimensions match the canvas.
///
/// **WHY THIS MATTERS**: The image block rides base64 inside JSON over the
/// socket; this proves the whole binary path end to end.
///
/// **BUG THIS CATCHES**: Would catch any disagreement between the rendered
/// frame and the encoded block, including double-encoding of the pixel data.
#[tokio::test]
async fn given_default_canvas_when_screenshotted_then_decodable_canvas_sized_block() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let payload = ok_payload(client.call(1, "screenshot", args(json!({}))).await);

    let Payload::Image(block) = payload else {
        panic!("expected image payload");
    };
    assert_eq!((block.width, block.height, block.channels), (800, 600, 4));
    assert_eq!(block.byte_len, 800 * 600 * 4);
    let pixels = block.to_pixels().expect("block should decode");
    assert_eq!(pixels.len(), block.byte_len);
}

/// **VALUE**: Verifies the points flow: add a points layer, read its
/// coordinates back, and run measurements over the wire.
#[tokio::test]
async fn given_points_when_added_then_readable_and_measurable() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    // WHEN: adding a points layer
    let payload = ok_payload(
        client
            .call(
                1,
                "add_points",
                args(json!({"coordinates": [[0.0, 0.0], [3.0, 4.0]], "name": "spots"})),
            )
            .await,
    );
    let Payload::Record(record) = payload else {
        panic!("expected add_points record");
    };
    assert_eq!(record.get("layer"), Some(&Payload::text("spots")));
    assert_eq!(record.get("count"), Some(&Payload::Int(2)));

    // THEN: the coordinates read back exactly
    let payload = ok_payload(
        client
            .call(2, "get_layer_data", args(json!({"layer": "spots"})))
            .await,
    );
    let Payload::Record(data) = payload else {
        panic!("expected coordinates record");
    };
    assert_eq!(
        data.get("coordinates"),
        Some(&Payload::List(vec![
            Payload::float_list(&[0.0, 0.0]),
            Payload::float_list(&[3.0, 4.0]),
        ]))
    );

    // AND: measurements work over the wire
    let payload = ok_payload(
        client
            .call(
                3,
                "measure_distance",
                args(json!({"point_a": [0.0, 0.0], "point_b": [3.0, 4.0]})),
            )
            .await,
    );
    assert_eq!(payload, Payload::Float(5.0));

    let payload = ok_payload(
        client
            .call(
                4,
                "measure_area",
                args(json!({"points": [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]})),
            )
            .await,
    );
    assert_eq!(payload, Payload::Float(4.0));
}

/// **VALUE**: Verifies styling calls mutate the viewer and the layer list
/// reflects them on the next read.
#[tokio::test]
async fn given_loaded_layer_when_styled_then_list_reflects_changes() {
    let (_controller, addr) = start_test_server().await;
    let mut client = TestClient::connect(addr).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.tif");
    std::fs::write(&path, b"x").unwrap();

    ok_payload(
        client
            .call(
                1,
                "load_file",
                args(json!({"path": path.to_string_lossy()})),
            )
            .await,
    );
    ok_payload(
        client
            .call(2, "set_colormap", args(json!({"layer": 0, "colormap": "viridis"})))
            .await,
    );
    ok_payload(
        client
            .call(3, "set_opacity", args(json!({"layer": 0, "opacity": 0.5})))
            .await,
    );

    let payload = ok_payload(client.call(4, "list_layers", args(json!({}))).await);
    let Payload::List(entries) = payload else {
        panic!("expected layer list");
    };
    let Payload::Record(entry) = &entries[0] else {
        panic!("expected layer record");
    };
    assert_eq!(entry.get("colormap"), Some(&Payload::text("viridis")));
    assert_eq!(entry.get("opacity"), Some(&Payload::Float(0.5)));
}
