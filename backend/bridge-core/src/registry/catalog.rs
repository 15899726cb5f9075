//! The built-in operation catalog.
//!
//! Registered once at process start; every operation a remote client can
//! invoke lives here. Handlers receive schema-validated arguments and the
//! viewer, run on the GUI thread, and return a [`Payload`] or a domain
//! error. Deeper argument structure the schema cannot express (e.g. point
//! coordinate lists) is validated inside the handler before any state is
//! touched.

use crate::codec::{ImageBlock, Payload};
use crate::error::viewer::ViewerError;
use crate::registry::schema::{ParamKind, ParamSchema, ParamSpec};
use crate::registry::{Arguments, OperationDescriptor, OperationRegistry};
use crate::viewer::{LayerSelector, Viewer, measure};

use crate::error::registry::RegistryError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

use serde_json::Value;

/// Build the registry of built-in viewer operations.
pub fn builtin() -> Result<OperationRegistry, RegistryError> {
    let mut registry = OperationRegistry::new();

    registry.register(OperationDescriptor::new(
        "load_file",
        "record {layer, source}",
        ParamSchema::new(vec![ParamSpec::required("path", ParamKind::Text)]),
        |viewer, args| {
            let path = require_text(args, "path")?;
            let layer = viewer.open_file(Path::new(&path))?;
            Ok(Payload::record([
                ("layer", Payload::text(layer.name.clone())),
                ("source", Payload::text(path)),
            ]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "list_layers",
        "list of layer records",
        ParamSchema::empty(),
        |viewer, _args| {
            let entries = viewer
                .layers()
                .iter()
                .map(|layer| {
                    Payload::record([
                        ("name", Payload::text(layer.name.clone())),
                        ("kind", Payload::text(layer.kind().as_str())),
                        ("visible", Payload::Bool(layer.visible)),
                        ("opacity", Payload::Float(layer.opacity)),
                        ("colormap", Payload::text(layer.colormap.clone())),
                        (
                            "source",
                            Payload::opt_text(
                                layer
                                    .source
                                    .as_ref()
                                    .map(|p| p.to_string_lossy().into_owned()),
                            ),
                        ),
                    ])
                })
                .collect();
            Ok(Payload::List(entries))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "add_points",
        "record {layer, count}",
        ParamSchema::new(vec![
            ParamSpec::required("coordinates", ParamKind::List),
            ParamSpec::optional("name", ParamKind::Text),
        ]),
        |viewer, args| {
            let coordinates = require_point_list(args, "coordinates")?;
            let count = coordinates.len() as i64;
            let layer = viewer.add_points(coordinates, text_arg(args, "name"))?;
            Ok(Payload::record([
                ("layer", Payload::text(layer.name.clone())),
                ("count", Payload::Int(count)),
            ]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "remove_layer",
        "record {removed}",
        ParamSchema::new(vec![ParamSpec::required("layer", ParamKind::LayerRef)]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let removed = viewer.remove_layer(&selector)?;
            Ok(Payload::record([(
                "removed",
                Payload::text(removed.name),
            )]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_layer_visibility",
        "null",
        ParamSchema::new(vec![
            ParamSpec::required("layer", ParamKind::LayerRef),
            ParamSpec::required("visible", ParamKind::Bool),
        ]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let visible = args.get("visible").and_then(Value::as_bool).unwrap_or(true);
            viewer.set_visibility(&selector, visible)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_opacity",
        "null",
        ParamSchema::new(vec![
            ParamSpec::required("layer", ParamKind::LayerRef),
            ParamSpec::required("opacity", ParamKind::Float),
        ]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let opacity = require_float(args, "opacity")?;
            viewer.set_opacity(&selector, opacity)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_colormap",
        "null",
        ParamSchema::new(vec![
            ParamSpec::required("layer", ParamKind::LayerRef),
            ParamSpec::required("colormap", ParamKind::Text),
        ]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let colormap = require_text(args, "colormap")?;
            viewer.set_colormap(&selector, &colormap)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_contrast_limits",
        "null",
        ParamSchema::new(vec![
            ParamSpec::required("layer", ParamKind::LayerRef),
            ParamSpec::required("low", ParamKind::Float),
            ParamSpec::required("high", ParamKind::Float),
        ]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let low = require_float(args, "low")?;
            let high = require_float(args, "high")?;
            viewer.set_contrast_limits(&selector, low, high)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "auto_contrast",
        "record {low, high}",
        ParamSchema::new(vec![ParamSpec::required("layer", ParamKind::LayerRef)]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let (low, high) = viewer.auto_contrast(&selector)?;
            Ok(Payload::record([
                ("low", Payload::Float(low)),
                ("high", Payload::Float(high)),
            ]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_gamma",
        "null",
        ParamSchema::new(vec![
            ParamSpec::required("layer", ParamKind::LayerRef),
            ParamSpec::required("gamma", ParamKind::Float).positive(),
        ]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let gamma = require_float(args, "gamma")?;
            viewer.set_gamma(&selector, gamma)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_camera",
        "null",
        ParamSchema::new(vec![
            ParamSpec::optional("center", ParamKind::List),
            ParamSpec::optional("zoom", ParamKind::Float).positive(),
            ParamSpec::optional("angle", ParamKind::List),
        ]),
        |viewer, args| {
            let center = optional_point(args, "center")?;
            let zoom = float_arg(args, "zoom");
            let angle = optional_point(args, "angle")?;
            viewer.set_camera(center, zoom, angle)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "get_camera",
        "record {center, zoom, angle, ndisplay}",
        ParamSchema::empty(),
        |viewer, _args| Ok(camera_record(viewer)),
    ))?;

    registry.register(OperationDescriptor::new(
        "reset_camera",
        "record {center, zoom, angle, ndisplay}",
        ParamSchema::empty(),
        |viewer, _args| {
            viewer.reset_camera();
            Ok(camera_record(viewer))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "toggle_view",
        "record {ndisplay}",
        ParamSchema::empty(),
        |viewer, _args| {
            let ndisplay = viewer.toggle_ndisplay();
            Ok(Payload::record([(
                "ndisplay",
                Payload::Int(ndisplay as i64),
            )]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "screenshot",
        "image block matching the canvas size",
        ParamSchema::empty(),
        |viewer, _args| {
            let frame = viewer.screenshot();
            let block = ImageBlock::from_frame(&frame).map_err(internal)?;
            Ok(Payload::Image(block))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "export_screenshot",
        "record {path, width, height, byte_len}",
        ParamSchema::new(vec![ParamSpec::required("path", ParamKind::Text)]),
        |viewer, args| {
            let path = require_text(args, "path")?;
            let frame = viewer.screenshot();
            let block = ImageBlock::from_frame(&frame).map_err(internal)?;
            let bytes = serde_json::to_vec(&block).map_err(|e| ViewerError::Internal {
                message: format!("failed to serialize image block: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
            std::fs::write(&path, bytes)?;
            Ok(Payload::record([
                ("path", Payload::text(path)),
                ("width", Payload::Int(block.width as i64)),
                ("height", Payload::Int(block.height as i64)),
                ("byte_len", Payload::Int(block.byte_len as i64)),
            ]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "get_layer_data",
        "image block or record {coordinates}",
        ParamSchema::new(vec![ParamSpec::required("layer", ParamKind::LayerRef)]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let layer = viewer.layer(&selector)?;
            match &layer.data {
                crate::viewer::LayerData::Image {
                    width,
                    height,
                    channels,
                    pixels,
                } => {
                    let block =
                        ImageBlock::from_pixels(*width, *height, *channels, pixels).map_err(internal)?;
                    Ok(Payload::Image(block))
                }
                crate::viewer::LayerData::Points { coordinates } => Ok(Payload::record([(
                    "coordinates",
                    Payload::List(
                        coordinates
                            .iter()
                            .map(|point| Payload::float_list(point))
                            .collect(),
                    ),
                )])),
            }
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "layer_statistics",
        "record {min, max, mean, std}",
        ParamSchema::new(vec![ParamSpec::required("layer", ParamKind::LayerRef)]),
        |viewer, args| {
            let selector = require_selector(args, "layer")?;
            let stats = viewer.layer_statistics(&selector)?;
            Ok(Payload::record([
                ("min", Payload::Float(stats.min)),
                ("max", Payload::Float(stats.max)),
                ("mean", Payload::Float(stats.mean)),
                ("std", Payload::Float(stats.std)),
            ]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "set_timestep",
        "null",
        ParamSchema::new(vec![ParamSpec::required("step", ParamKind::Int)]),
        |viewer, args| {
            let step = require_int(args, "step")?;
            let step = usize::try_from(step).map_err(|_| ViewerError::InvalidValue {
                message: format!("timestep must be non-negative, got {step}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
            viewer.set_timestep(step)?;
            Ok(Payload::Null)
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "get_dims_info",
        "record {current_step, nsteps, axis_labels, ndisplay}",
        ParamSchema::empty(),
        |viewer, _args| {
            let dims = viewer.dims();
            Ok(Payload::record([
                ("current_step", Payload::Int(dims.current_step as i64)),
                ("nsteps", Payload::Int(dims.nsteps as i64)),
                (
                    "axis_labels",
                    Payload::List(
                        dims.axis_labels
                            .iter()
                            .map(|label| Payload::text(label.clone()))
                            .collect(),
                    ),
                ),
                ("ndisplay", Payload::Int(viewer.ndisplay() as i64)),
            ]))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "measure_distance",
        "float",
        ParamSchema::new(vec![
            ParamSpec::required("point_a", ParamKind::List),
            ParamSpec::required("point_b", ParamKind::List),
        ]),
        |_viewer, args| {
            let a = require_point(args, "point_a")?;
            let b = require_point(args, "point_b")?;
            Ok(Payload::Float(measure::distance(&a, &b)?))
        },
    ))?;

    registry.register(OperationDescriptor::new(
        "measure_area",
        "float",
        ParamSchema::new(vec![ParamSpec::required("points", ParamKind::List)]),
        |_viewer, args| {
            let points = require_point_list(args, "points")?;
            Ok(Payload::Float(measure::polygon_area(&points)?))
        },
    ))?;

    Ok(registry)
}

fn camera_record(viewer: &Viewer) -> Payload {
    let camera = viewer.camera();
    Payload::record([
        ("center", Payload::float_list(&camera.center)),
        ("zoom", Payload::Float(camera.zoom)),
        ("angle", Payload::float_list(&camera.angles)),
        ("ndisplay", Payload::Int(viewer.ndisplay() as i64)),
    ])
}

fn internal(error: crate::error::codec::CodecError) -> ViewerError {
    ViewerError::Internal {
        message: error.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

// ----------------------------------------------------------------------
// argument extraction
//
// The schema guarantees presence and JSON kind for required params, so the
// `require_*` helpers only fail on structure the schema cannot see (nested
// coordinate lists, negative indices).
// ----------------------------------------------------------------------

fn text_arg(args: &Arguments, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_string)
}

fn float_arg(args: &Arguments, name: &str) -> Option<f64> {
    args.get(name).and_then(Value::as_f64)
}

#[track_caller]
fn require_text(args: &Arguments, name: &str) -> Result<String, ViewerError> {
    text_arg(args, name).ok_or_else(|| missing(name))
}

#[track_caller]
fn require_float(args: &Arguments, name: &str) -> Result<f64, ViewerError> {
    float_arg(args, name).ok_or_else(|| missing(name))
}

#[track_caller]
fn require_int(args: &Arguments, name: &str) -> Result<i64, ViewerError> {
    args.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| missing(name))
}

#[track_caller]
fn require_selector(args: &Arguments, name: &str) -> Result<LayerSelector, ViewerError> {
    match args.get(name) {
        Some(Value::String(text)) => Ok(LayerSelector::Name(text.clone())),
        Some(value) if value.is_u64() => Ok(LayerSelector::Index(
            value.as_u64().unwrap_or_default() as usize,
        )),
        Some(value) if value.is_i64() => Err(ViewerError::InvalidValue {
            message: format!("{name}: layer index must be non-negative, got {value}"),
            location: ErrorLocation::from(Location::caller()),
        }),
        _ => Err(missing(name)),
    }
}

fn point_from(value: &Value, name: &str) -> Result<Vec<f64>, ViewerError> {
    let Value::Array(items) = value else {
        return Err(ViewerError::InvalidValue {
            message: format!("{name}: expected a list of numbers"),
            location: ErrorLocation::from(Location::caller()),
        });
    };
    items
        .iter()
        .map(|item| {
            item.as_f64().ok_or_else(|| ViewerError::InvalidValue {
                message: format!("{name}: expected a list of numbers, found {item}"),
                location: ErrorLocation::from(Location::caller()),
            })
        })
        .collect()
}

#[track_caller]
fn require_point(args: &Arguments, name: &str) -> Result<Vec<f64>, ViewerError> {
    let value = args.get(name).ok_or_else(|| missing(name))?;
    point_from(value, name)
}

fn optional_point(args: &Arguments, name: &str) -> Result<Option<Vec<f64>>, ViewerError> {
    match args.get(name).filter(|value| !value.is_null()) {
        Some(value) => point_from(value, name).map(Some),
        None => Ok(None),
    }
}

#[track_caller]
fn require_point_list(args: &Arguments, name: &str) -> Result<Vec<Vec<f64>>, ViewerError> {
    let value = args.get(name).ok_or_else(|| missing(name))?;
    let Value::Array(items) = value else {
        return Err(ViewerError::InvalidValue {
            message: format!("{name}: expected a list of points"),
            location: ErrorLocation::from(Location::caller()),
        });
    };
    items.iter().map(|item| point_from(item, name)).collect()
}

#[track_caller]
fn missing(name: &str) -> ViewerError {
    // unreachable when the schema matches the handler; kept as a guard
    ViewerError::Internal {
        message: format!("validated arguments are missing '{name}'"),
        location: ErrorLocation::from(Location::caller()),
    }
}
