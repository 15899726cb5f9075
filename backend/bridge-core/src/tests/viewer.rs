// Unit tests for the viewer model

use crate::error::viewer::ViewerError;
use crate::viewer::{measure, LayerKind, LayerSelector, Viewer};

/// **VALUE**: Verifies file layers require an existing path and record it.
///
/// **WHY THIS MATTERS**: load_file is the first thing a remote client does;
/// a viewer that accepts a bogus path would report a layer that renders
/// nothing with no error anywhere.
///
/// **BUG THIS CATCHES**: Would catch the existence check being dropped or
/// the source path not being carried onto the layer.
#[test]
fn given_file_path_when_opened_then_layer_records_source() {
    let mut viewer = Viewer::default();

    let missing = viewer.open_file(std::path::Path::new("/no/such/file.tif"));
    assert!(matches!(missing, Err(ViewerError::FileNotFound { .. })));
    assert!(viewer.layers().is_empty(), "failed open must not add a layer");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.tif");
    std::fs::write(&path, b"not a real tiff").unwrap();

    let layer = viewer.open_file(&path).expect("existing file should open");
    assert_eq!(layer.name, "cells");
    assert_eq!(layer.kind(), LayerKind::Image);
    assert_eq!(layer.source.as_deref(), Some(path.as_path()));
}

/// **VALUE**: Verifies duplicate layer names get bracketed suffixes.
#[test]
fn given_duplicate_names_when_added_then_suffixed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.tif");
    std::fs::write(&path, b"x").unwrap();

    let mut viewer = Viewer::default();
    viewer.open_file(&path).unwrap();
    viewer.open_file(&path).unwrap();
    viewer.open_file(&path).unwrap();

    let names: Vec<&str> = viewer.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["cells", "cells [1]", "cells [2]"]);
}

/// **VALUE**: Verifies styling setters validate before mutating.
///
/// **WHY THIS MATTERS**: Remote calls must either apply fully or leave the
/// viewer untouched; a half-applied styling change is unrecoverable from
/// the client side because there is no read-back of the failed field.
#[test]
fn given_invalid_styling_values_when_set_then_rejected_and_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.tif");
    std::fs::write(&path, b"x").unwrap();

    let mut viewer = Viewer::default();
    viewer.open_file(&path).unwrap();
    let selector = LayerSelector::Index(0);

    assert!(viewer.set_opacity(&selector, 1.5).is_err());
    assert!(viewer.set_opacity(&selector, -0.1).is_err());
    assert!(viewer.set_colormap(&selector, "rainbow").is_err());
    assert!(viewer.set_contrast_limits(&selector, 10.0, 10.0).is_err());
    assert!(viewer.set_gamma(&selector, 0.0).is_err());

    let layer = viewer.layer(&selector).unwrap();
    assert_eq!(layer.opacity, 1.0);
    assert_eq!(layer.colormap, "gray");
    assert_eq!(layer.contrast_limits, (0.0, 255.0));
    assert_eq!(layer.gamma, 1.0);

    viewer.set_opacity(&selector, 0.25).unwrap();
    viewer.set_colormap(&selector, "viridis").unwrap();
    viewer.set_contrast_limits(&selector, 10.0, 200.0).unwrap();
    viewer.set_gamma(&selector, 2.2).unwrap();

    let layer = viewer.layer(&selector).unwrap();
    assert_eq!(layer.opacity, 0.25);
    assert_eq!(layer.colormap, "viridis");
    assert_eq!(layer.contrast_limits, (10.0, 200.0));
    assert_eq!(layer.gamma, 2.2);
}

/// **VALUE**: Verifies auto-contrast stretches to the actual pixel range.
#[test]
fn given_gradient_layer_when_auto_contrast_then_limits_span_pixel_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grad.tif");
    std::fs::write(&path, b"x").unwrap();

    let mut viewer = Viewer::default();
    viewer.open_file(&path).unwrap();

    let limits = viewer.auto_contrast(&LayerSelector::Index(0)).unwrap();

    // the synthetic gradient raster covers the full byte range
    assert_eq!(limits, (0.0, 255.0));
    assert_eq!(
        viewer.layer(&LayerSelector::Index(0)).unwrap().contrast_limits,
        limits
    );
}

/// **VALUE**: Verifies a rejected camera update leaves all fields untouched.
///
/// **BUG THIS CATCHES**: Would catch `set_camera` applying validated fields
/// before rejecting the invalid one.
#[test]
fn given_partially_invalid_camera_update_when_set_then_nothing_applied() {
    let mut viewer = Viewer::default();

    let result = viewer.set_camera(None, Some(4.0), Some(vec![1.0, 2.0]));

    assert!(matches!(result, Err(ViewerError::InvalidValue { .. })));
    assert_eq!(viewer.camera().zoom, 1.0, "valid zoom must not leak through");

    viewer
        .set_camera(Some(vec![5.0, 6.0]), Some(2.0), None)
        .unwrap();
    assert_eq!(viewer.camera().center, vec![5.0, 6.0]);
    assert_eq!(viewer.camera().zoom, 2.0);
    assert_eq!(viewer.camera().angles, vec![0.0, 0.0, 90.0], "unset field keeps prior value");

    viewer.reset_camera();
    assert_eq!(viewer.camera().zoom, 1.0);
    assert_eq!(viewer.camera().center, vec![0.0, 0.0]);
}

/// **VALUE**: Verifies display mode toggles between 2 and 3.
#[test]
fn given_viewer_when_toggling_ndisplay_then_alternates() {
    let mut viewer = Viewer::default();

    assert_eq!(viewer.ndisplay(), 2);
    assert_eq!(viewer.toggle_ndisplay(), 3);
    assert_eq!(viewer.toggle_ndisplay(), 2);
}

/// **VALUE**: Verifies timestep navigation is bounds-checked.
#[test]
fn given_timestep_out_of_range_when_set_then_rejected() {
    let mut viewer = Viewer::default();

    assert!(viewer.set_timestep(0).is_ok());
    let result = viewer.set_timestep(viewer.dims().nsteps);
    assert!(matches!(result, Err(ViewerError::InvalidValue { .. })));
    assert_eq!(viewer.dims().current_step, 0);
}

/// **VALUE**: Verifies screenshots always match the canvas size and respect
/// layer visibility.
///
/// **WHY THIS MATTERS**: The end-to-end contract is that a screenshot of an
/// empty viewer is a background-filled canvas of the configured size; a
/// frame of the wrong size breaks every downstream image consumer.
#[test]
fn given_viewer_when_screenshotted_then_canvas_sized_and_visibility_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cells.tif");
    std::fs::write(&path, b"x").unwrap();

    let mut viewer = Viewer::new(32, 16);
    assert_eq!(viewer.canvas_size(), (32, 16));

    let empty = viewer.screenshot();
    assert_eq!((empty.width, empty.height, empty.channels), (32, 16, 4));
    assert_eq!(empty.pixels.len(), 32 * 16 * 4);
    assert!(
        empty.pixels.chunks_exact(4).all(|p| p == [0, 0, 0, 255]),
        "empty viewer renders the opaque background"
    );

    viewer.open_file(&path).unwrap();
    let rendered = viewer.screenshot();
    assert_eq!((rendered.width, rendered.height), (32, 16));
    assert_ne!(rendered.pixels, empty.pixels, "a visible layer must show up");

    viewer.set_visibility(&LayerSelector::Index(0), false).unwrap();
    let hidden = viewer.screenshot();
    assert_eq!(hidden.pixels, empty.pixels, "hidden layers must not render");
}

/// **VALUE**: Verifies layer resolution by name and by index, including the
/// structured errors for unknown references.
#[test]
fn given_selectors_when_resolving_layers_then_name_and_index_both_work() {
    let mut viewer = Viewer::default();
    viewer
        .add_points(vec![vec![0.0, 0.0], vec![1.0, 1.0]], Some(String::from("spots")))
        .unwrap();

    assert!(viewer.layer(&LayerSelector::Name(String::from("spots"))).is_ok());
    assert!(viewer.layer(&LayerSelector::Index(0)).is_ok());

    assert!(matches!(
        viewer.layer(&LayerSelector::Name(String::from("ghost"))),
        Err(ViewerError::LayerNotFound { .. })
    ));
    assert!(matches!(
        viewer.layer(&LayerSelector::Index(5)),
        Err(ViewerError::LayerIndexOutOfRange { .. })
    ));

    let removed = viewer
        .remove_layer(&LayerSelector::Name(String::from("spots")))
        .unwrap();
    assert_eq!(removed.name, "spots");
    assert!(viewer.layers().is_empty());
}

/// **VALUE**: Verifies statistics are only offered for image layers.
#[test]
fn given_points_layer_when_statistics_requested_then_unsupported() {
    let mut viewer = Viewer::default();
    viewer.add_points(vec![vec![0.0, 0.0]], None).unwrap();

    let result = viewer.layer_statistics(&LayerSelector::Index(0));

    assert!(matches!(result, Err(ViewerError::UnsupportedLayer { .. })));
}

/// **VALUE**: Verifies distance and area math on known geometry.
///
/// **BUG THIS CATCHES**: Would catch a sign error in the shoelace sum or a
/// missing square root in the distance.
#[test]
fn given_known_geometry_when_measured_then_exact_values() {
    let d = measure::distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
    assert_eq!(d, 5.0);

    assert!(matches!(
        measure::distance(&[0.0, 0.0], &[1.0]),
        Err(ViewerError::InvalidValue { .. })
    ));

    let square = vec![
        vec![0.0, 0.0],
        vec![2.0, 0.0],
        vec![2.0, 2.0],
        vec![0.0, 2.0],
    ];
    assert_eq!(measure::polygon_area(&square).unwrap(), 4.0);

    assert!(matches!(
        measure::polygon_area(&[vec![0.0, 0.0], vec![1.0, 1.0]]),
        Err(ViewerError::InvalidValue { .. })
    ));
}
