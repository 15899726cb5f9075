// Unit tests for the operation registry and built-in catalog

use crate::codec::Payload;
use crate::error::registry::RegistryError;
use crate::registry::schema::ParamSchema;
use crate::registry::{catalog, Arguments, OperationDescriptor, OperationRegistry};

use serde_json::json;

fn noop(name: &'static str) -> OperationDescriptor {
    OperationDescriptor::new(name, "null", ParamSchema::empty(), |_viewer, _args| {
        Ok(Payload::Null)
    })
}

fn args(value: serde_json::Value) -> Arguments {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test arguments must be a JSON object"),
    }
}

/// **VALUE**: Verifies rebinding an operation name is refused.
///
/// **WHY THIS MATTERS**: The registry is built once at startup; a silent
/// overwrite would let one catalog entry shadow another and change remote
/// behavior without any error.
///
/// **BUG THIS CATCHES**: Would catch `register` switching to a plain
/// `HashMap::insert`.
#[test]
fn given_registered_name_when_registered_again_then_duplicate_error() {
    let mut registry = OperationRegistry::new();
    registry.register(noop("list_layers")).unwrap();

    let result = registry.register(noop("list_layers"));

    assert!(
        matches!(result, Err(RegistryError::DuplicateName { ref name, .. }) if name == "list_layers"),
        "expected DuplicateName, got {result:?}"
    );
    assert_eq!(registry.len(), 1, "failed registration must not grow the table");
}

/// **VALUE**: Verifies unknown names fail lookup with a structured error.
#[test]
fn given_unknown_name_when_looked_up_then_unknown_operation_error() {
    let registry = OperationRegistry::new();

    let result = registry.lookup("no_such_op");

    assert!(
        matches!(result, Err(RegistryError::UnknownOperation { ref name, .. }) if name == "no_such_op"),
        "expected UnknownOperation, got {result:?}"
    );
}

/// **VALUE**: Verifies the built-in catalog registers the full operation
/// surface the remote protocol documents.
///
/// **WHY THIS MATTERS**: Remote clients dispatch by name; a missing catalog
/// entry silently turns a documented operation into UnknownOperation.
///
/// **BUG THIS CATCHES**: Would catch an operation dropped during catalog
/// refactoring.
#[test]
fn given_builtin_catalog_when_built_then_documented_operations_present() {
    let registry = catalog::builtin().expect("catalog must build");

    for name in [
        "load_file",
        "list_layers",
        "add_points",
        "remove_layer",
        "set_layer_visibility",
        "set_opacity",
        "set_colormap",
        "set_contrast_limits",
        "auto_contrast",
        "set_gamma",
        "set_camera",
        "get_camera",
        "reset_camera",
        "toggle_view",
        "screenshot",
        "export_screenshot",
        "get_layer_data",
        "layer_statistics",
        "set_timestep",
        "get_dims_info",
        "measure_distance",
        "measure_area",
    ] {
        assert!(registry.lookup(name).is_ok(), "catalog is missing '{name}'");
    }

    // every descriptor carries a result-shape hint for operator-facing output
    for name in registry.names() {
        let descriptor = registry.lookup(name).unwrap();
        assert!(!descriptor.summary().is_empty(), "'{name}' has no summary");
    }
}

/// **VALUE**: Verifies `validate` combines lookup and schema checking.
#[test]
fn given_builtin_catalog_when_validating_calls_then_lookup_and_schema_apply() {
    let registry = catalog::builtin().expect("catalog must build");

    assert!(registry.validate("list_layers", &Arguments::new()).is_ok());
    assert!(matches!(
        registry.validate("no_such_op", &Arguments::new()),
        Err(RegistryError::UnknownOperation { .. })
    ));
    assert!(matches!(
        registry.validate("load_file", &Arguments::new()),
        Err(RegistryError::InvalidArguments { .. })
    ));
    assert!(matches!(
        registry.validate("set_camera", &args(json!({"zoom": -1}))),
        Err(RegistryError::InvalidArguments { .. })
    ));
}

/// **VALUE**: Verifies `names` is sorted for stable operator-facing output.
#[test]
fn given_registry_when_listing_names_then_sorted() {
    let mut registry = OperationRegistry::new();
    registry.register(noop("zebra")).unwrap();
    registry.register(noop("alpha")).unwrap();

    assert_eq!(registry.names(), vec!["alpha", "zebra"]);
}
