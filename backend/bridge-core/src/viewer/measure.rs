//! Basic measurement utilities over layer coordinates.

use crate::error::viewer::ViewerError;

use common::ErrorLocation;

use std::panic::Location;

/// Euclidean distance between two points of equal dimensionality.
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64, ViewerError> {
    if a.is_empty() || a.len() != b.len() {
        return Err(ViewerError::InvalidValue {
            message: format!(
                "distance requires two points of equal dimensionality, got {} and {}",
                a.len(),
                b.len()
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Ok(sum.sqrt())
}

/// Area of a simple polygon given as 2-D vertices, via the shoelace formula.
pub fn polygon_area(points: &[Vec<f64>]) -> Result<f64, ViewerError> {
    if points.len() < 3 {
        return Err(ViewerError::InvalidValue {
            message: format!("area requires at least 3 vertices, got {}", points.len()),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if let Some(bad) = points.iter().find(|p| p.len() != 2) {
        return Err(ViewerError::InvalidValue {
            message: format!("area requires 2-D vertices, got one with {} coordinates", bad.len()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut twice_area = 0.0;
    for i in 0..points.len() {
        let (a, b) = (&points[i], &points[(i + 1) % points.len()]);
        twice_area += a[0] * b[1] - b[0] * a[1];
    }
    Ok(twice_area.abs() / 2.0)
}
