// Unit tests for parameter schema validation
// Every tool call is checked against its schema before dispatch

use crate::error::registry::RegistryError;
use crate::registry::schema::{ParamKind, ParamSchema, ParamSpec};
use crate::registry::Arguments;

use serde_json::json;

fn args(value: serde_json::Value) -> Arguments {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test arguments must be a JSON object"),
    }
}

fn camera_schema() -> ParamSchema {
    ParamSchema::new(vec![
        ParamSpec::optional("center", ParamKind::List),
        ParamSpec::optional("zoom", ParamKind::Float).positive(),
        ParamSpec::optional("angle", ParamKind::List),
    ])
}

/// **VALUE**: Verifies schema-conforming arguments validate cleanly.
///
/// **WHY THIS MATTERS**: Validation sits on every request path; a false
/// rejection would make valid remote calls unusable.
///
/// **BUG THIS CATCHES**: Would catch an overly strict kind check (e.g.
/// treating an integer zoom as mistyped even though it is a valid number).
#[test]
fn given_conforming_arguments_when_validated_then_passes() {
    let schema = camera_schema();

    let result = schema.validate("set_camera", &args(json!({"zoom": 2, "center": [0.0, 1.0]})));

    assert!(result.is_ok(), "conforming arguments should validate: {result:?}");
}

/// **VALUE**: Verifies missing, unexpected, and mistyped parameters are all
/// reported together.
///
/// **WHY THIS MATTERS**: A remote client should be able to fix a bad call in
/// one round trip instead of discovering problems one at a time.
///
/// **BUG THIS CATCHES**: Would catch validation that stops at the first
/// problem or drops one of the three lists.
#[test]
fn given_multiple_problems_when_validated_then_all_reported() {
    let schema = ParamSchema::new(vec![
        ParamSpec::required("path", ParamKind::Text),
        ParamSpec::required("opacity", ParamKind::Float),
    ]);

    let result = schema.validate(
        "set_opacity",
        &args(json!({"opacity": "high", "bogus": true})),
    );

    let (missing, unexpected, mistyped) = match result {
        Err(RegistryError::InvalidArguments {
            missing,
            unexpected,
            mistyped,
            ..
        }) => (missing, unexpected, mistyped),
        other => panic!("expected InvalidArguments, got {other:?}"),
    };
    assert_eq!(missing, vec!["path"]);
    assert_eq!(unexpected, vec!["bogus"]);
    assert_eq!(mistyped.len(), 1);
    assert!(mistyped[0].starts_with("opacity:"), "got {mistyped:?}");
}

/// **VALUE**: Verifies the positivity constraint rejects zero and negative
/// numbers for parameters like zoom and gamma.
///
/// **WHY THIS MATTERS**: A negative zoom must be refused at validation so
/// viewer state is never touched (end-to-end scenario: set_camera with
/// zoom -1 leaves the camera unchanged).
///
/// **BUG THIS CATCHES**: Would catch the constraint being dropped or only
/// applied to required parameters.
#[test]
fn given_negative_zoom_when_validated_then_mistyped() {
    let schema = camera_schema();

    let result = schema.validate("set_camera", &args(json!({"zoom": -1})));

    let mistyped = match result {
        Err(RegistryError::InvalidArguments { mistyped, .. }) => mistyped,
        other => panic!("expected InvalidArguments, got {other:?}"),
    };
    assert!(
        mistyped[0].contains("must be positive"),
        "got {mistyped:?}"
    );

    let zero = camera_schema().validate("set_camera", &args(json!({"zoom": 0})));
    assert!(zero.is_err(), "zero zoom should be rejected");
}

/// **VALUE**: Verifies a layer reference accepts both a name and an index.
#[test]
fn given_layer_ref_when_validated_then_accepts_text_and_int() {
    let schema = ParamSchema::new(vec![ParamSpec::required("layer", ParamKind::LayerRef)]);

    assert!(schema.validate("remove_layer", &args(json!({"layer": "cells"}))).is_ok());
    assert!(schema.validate("remove_layer", &args(json!({"layer": 0}))).is_ok());
    assert!(
        schema.validate("remove_layer", &args(json!({"layer": 1.5}))).is_err(),
        "fractional layer reference should be mistyped"
    );
}

/// **VALUE**: Verifies an explicit JSON null counts as an absent argument.
///
/// **BUG THIS CATCHES**: Would catch null being type-checked against the
/// declared kind and reported as mistyped for optional parameters.
#[test]
fn given_explicit_null_when_validated_then_treated_as_absent() {
    let schema = camera_schema();

    let optional_null = schema.validate("set_camera", &args(json!({"zoom": null})));
    assert!(optional_null.is_ok(), "null optional should be absent: {optional_null:?}");

    let required = ParamSchema::new(vec![ParamSpec::required("path", ParamKind::Text)]);
    let required_null = required.validate("load_file", &args(json!({"path": null})));
    let Err(RegistryError::InvalidArguments { missing, .. }) = required_null else {
        panic!("null required parameter should be missing");
    };
    assert_eq!(missing, vec!["path"]);
}
