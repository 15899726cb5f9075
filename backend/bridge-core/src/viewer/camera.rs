/// Camera parameters: world-space center, zoom factor, and Euler angles for
/// the 3-D display mode. Zoom must stay positive; the registry schema
/// enforces that before a set ever reaches the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub center: Vec<f64>,
    pub zoom: f64,
    pub angles: Vec<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: vec![0.0, 0.0],
            zoom: 1.0,
            angles: vec![0.0, 0.0, 90.0],
        }
    }
}
