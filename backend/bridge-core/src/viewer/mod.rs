//! Minimal viewer model behind the bridge.
//!
//! The real viewer is an external collaborator; this module implements the
//! command API the operation catalog consumes and nothing more. Every method
//! here is called exclusively from the GUI event-loop thread (see
//! [`crate::gui`]), so the struct holds plain owned state with no locking.
//!
//! Handlers are expected to apply changes atomically or not at all: each
//! mutating method validates its inputs before touching any state.

pub mod camera;
pub mod dims;
pub mod layer;
pub mod measure;

pub use camera::Camera;
pub use dims::Dims;
pub use layer::{Layer, LayerData, LayerKind};

use crate::error::viewer::ViewerError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;

/// Colormaps the viewer accepts. Kept deliberately small; unknown names are
/// rejected rather than silently mapped.
pub const COLORMAPS: &[&str] = &[
    "gray", "viridis", "magma", "inferno", "plasma", "turbo", "red", "green", "blue",
];

const DEFAULT_CANVAS_WIDTH: u32 = 800;
const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Identifies a layer by name or list position, mirroring the remote
/// protocol's "name or index" convention.
#[derive(Debug, Clone)]
pub enum LayerSelector {
    Name(String),
    Index(usize),
}

/// A rendered canvas: tightly packed RGBA bytes, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

/// Summary statistics over an image layer's raw pixel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

pub struct Viewer {
    layers: Vec<Layer>,
    camera: Camera,
    dims: Dims,
    canvas_width: u32,
    canvas_height: u32,
    ndisplay: u8,
    background: [u8; 4],
}

impl Viewer {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            layers: Vec::new(),
            camera: Camera::default(),
            dims: Dims::default(),
            canvas_width,
            canvas_height,
            ndisplay: 2,
            background: [0, 0, 0, u8::MAX],
        }
    }

    // ------------------------------------------------------------------
    // layer lifecycle
    // ------------------------------------------------------------------

    /// Register a file-backed layer. The file must exist; decoding it is the
    /// job of external loaders, so only the source path is recorded.
    pub fn open_file(&mut self, path: &Path) -> Result<&Layer, ViewerError> {
        if !path.exists() {
            return Err(ViewerError::FileNotFound {
                path: path.to_path_buf(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let base = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("layer"));
        let name = self.unique_name(&base);
        self.layers.push(Layer::from_file(name, path.to_path_buf()));
        let index = self.layers.len() - 1;
        Ok(&self.layers[index])
    }

    pub fn add_points(
        &mut self,
        coordinates: Vec<Vec<f64>>,
        name: Option<String>,
    ) -> Result<&Layer, ViewerError> {
        let dim = coordinates.first().map(Vec::len).unwrap_or(2);
        if dim == 0 || coordinates.iter().any(|p| p.len() != dim) {
            return Err(ViewerError::InvalidValue {
                message: String::from("points must share a common non-zero dimensionality"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let name = self.unique_name(name.as_deref().unwrap_or("Points"));
        self.layers.push(Layer::points(name, coordinates));
        let index = self.layers.len() - 1;
        Ok(&self.layers[index])
    }

    pub fn remove_layer(&mut self, selector: &LayerSelector) -> Result<Layer, ViewerError> {
        let index = self.resolve(selector)?;
        Ok(self.layers.remove(index))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, selector: &LayerSelector) -> Result<&Layer, ViewerError> {
        let index = self.resolve(selector)?;
        Ok(&self.layers[index])
    }

    // ------------------------------------------------------------------
    // layer styling
    // ------------------------------------------------------------------

    pub fn set_visibility(
        &mut self,
        selector: &LayerSelector,
        visible: bool,
    ) -> Result<(), ViewerError> {
        let index = self.resolve(selector)?;
        self.layers[index].visible = visible;
        Ok(())
    }

    pub fn set_opacity(
        &mut self,
        selector: &LayerSelector,
        opacity: f64,
    ) -> Result<(), ViewerError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ViewerError::InvalidValue {
                message: format!("opacity must be within [0, 1], got {opacity}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let index = self.resolve(selector)?;
        self.layers[index].opacity = opacity;
        Ok(())
    }

    pub fn set_colormap(
        &mut self,
        selector: &LayerSelector,
        colormap: &str,
    ) -> Result<(), ViewerError> {
        if !COLORMAPS.contains(&colormap) {
            return Err(ViewerError::InvalidValue {
                message: format!("unknown colormap '{colormap}'"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let index = self.resolve(selector)?;
        self.layers[index].colormap = colormap.to_string();
        Ok(())
    }

    pub fn set_contrast_limits(
        &mut self,
        selector: &LayerSelector,
        low: f64,
        high: f64,
    ) -> Result<(), ViewerError> {
        if low >= high {
            return Err(ViewerError::InvalidValue {
                message: format!("contrast limits require low < high, got [{low}, {high}]"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let index = self.resolve(selector)?;
        self.layers[index].contrast_limits = (low, high);
        Ok(())
    }

    /// Stretch contrast limits to the layer's actual pixel range.
    pub fn auto_contrast(&mut self, selector: &LayerSelector) -> Result<(f64, f64), ViewerError> {
        let index = self.resolve(selector)?;
        let stats = image_statistics(&self.layers[index])?;
        let limits = if stats.min < stats.max {
            (stats.min, stats.max)
        } else {
            // flat image; keep a non-degenerate interval
            (stats.min, stats.min + 1.0)
        };
        self.layers[index].contrast_limits = limits;
        Ok(limits)
    }

    pub fn set_gamma(&mut self, selector: &LayerSelector, gamma: f64) -> Result<(), ViewerError> {
        if gamma <= 0.0 {
            return Err(ViewerError::InvalidValue {
                message: format!("gamma must be positive, got {gamma}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let index = self.resolve(selector)?;
        self.layers[index].gamma = gamma;
        Ok(())
    }

    // ------------------------------------------------------------------
    // camera and display mode
    // ------------------------------------------------------------------

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(
        &mut self,
        center: Option<Vec<f64>>,
        zoom: Option<f64>,
        angles: Option<Vec<f64>>,
    ) -> Result<(), ViewerError> {
        if let Some(center) = &center {
            if center.is_empty() || center.len() > 3 {
                return Err(ViewerError::InvalidValue {
                    message: format!("camera center needs 1-3 coordinates, got {}", center.len()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
        if let Some(zoom) = zoom {
            if zoom <= 0.0 {
                return Err(ViewerError::InvalidValue {
                    message: format!("zoom must be positive, got {zoom}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
        if let Some(angles) = &angles {
            if angles.len() != 3 {
                return Err(ViewerError::InvalidValue {
                    message: format!("camera angles need 3 values, got {}", angles.len()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        // all inputs validated; apply as one atomic change
        if let Some(center) = center {
            self.camera.center = center;
        }
        if let Some(zoom) = zoom {
            self.camera.zoom = zoom;
        }
        if let Some(angles) = angles {
            self.camera.angles = angles;
        }
        Ok(())
    }

    pub fn reset_camera(&mut self) {
        self.camera = Camera::default();
    }

    pub fn ndisplay(&self) -> u8 {
        self.ndisplay
    }

    /// Flip between 2-D and 3-D display. Returns the new mode.
    pub fn toggle_ndisplay(&mut self) -> u8 {
        self.ndisplay = if self.ndisplay == 2 { 3 } else { 2 };
        self.ndisplay
    }

    // ------------------------------------------------------------------
    // dims / time-series navigation
    // ------------------------------------------------------------------

    pub fn dims(&self) -> &Dims {
        &self.dims
    }

    pub fn set_timestep(&mut self, step: usize) -> Result<(), ViewerError> {
        if step >= self.dims.nsteps {
            return Err(ViewerError::InvalidValue {
                message: format!(
                    "timestep {step} out of range ({} steps)",
                    self.dims.nsteps
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.dims.current_step = step;
        Ok(())
    }

    // ------------------------------------------------------------------
    // rendering and introspection
    // ------------------------------------------------------------------

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Composite all visible image layers into an RGBA canvas buffer.
    ///
    /// Layers are scaled to the canvas with nearest-neighbour sampling and
    /// blended front-to-back by opacity. The frame dimensions always match
    /// the canvas size.
    pub fn screenshot(&self) -> ImageFrame {
        let (cw, ch) = (self.canvas_width, self.canvas_height);
        let mut pixels = vec![0u8; (cw * ch * 4) as usize];
        for pixel in pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&self.background);
        }

        for layer in self.layers.iter().filter(|l| l.visible) {
            let LayerData::Image {
                width,
                height,
                channels,
                pixels: source,
            } = &layer.data
            else {
                continue;
            };
            if *width == 0 || *height == 0 {
                continue;
            }

            for y in 0..ch {
                let sy = (y as u64 * *height as u64 / ch as u64) as u32;
                for x in 0..cw {
                    let sx = (x as u64 * *width as u64 / cw as u64) as u32;
                    let src = sample_rgba(source, *width, *channels, sx, sy);
                    let alpha = layer.opacity * (src[3] as f64 / 255.0);
                    let offset = ((y * cw + x) * 4) as usize;
                    for channel in 0..3 {
                        let dst = pixels[offset + channel] as f64;
                        let blended = src[channel] as f64 * alpha + dst * (1.0 - alpha);
                        pixels[offset + channel] = blended.round() as u8;
                    }
                }
            }
        }

        ImageFrame {
            width: cw,
            height: ch,
            channels: 4,
            pixels,
        }
    }

    pub fn layer_statistics(
        &self,
        selector: &LayerSelector,
    ) -> Result<LayerStatistics, ViewerError> {
        let index = self.resolve(selector)?;
        image_statistics(&self.layers[index])
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    fn resolve(&self, selector: &LayerSelector) -> Result<usize, ViewerError> {
        match selector {
            LayerSelector::Index(index) => {
                if *index < self.layers.len() {
                    Ok(*index)
                } else {
                    Err(ViewerError::LayerIndexOutOfRange {
                        index: *index,
                        len: self.layers.len(),
                        location: ErrorLocation::from(Location::caller()),
                    })
                }
            }
            LayerSelector::Name(name) => self
                .layers
                .iter()
                .position(|layer| layer.name == *name)
                .ok_or_else(|| ViewerError::LayerNotFound {
                    name: name.clone(),
                    location: ErrorLocation::from(Location::caller()),
                }),
        }
    }

    /// Suffix duplicate layer names the way interactive viewers do:
    /// "cells", "cells [1]", "cells [2]", ...
    fn unique_name(&self, base: &str) -> String {
        if !self.layers.iter().any(|layer| layer.name == base) {
            return base.to_string();
        }
        let mut counter = 1;
        loop {
            let candidate = format!("{base} [{counter}]");
            if !self.layers.iter().any(|layer| layer.name == candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

fn sample_rgba(source: &[u8], width: u32, channels: u8, x: u32, y: u32) -> [u8; 4] {
    let offset = ((y * width + x) * channels as u32) as usize;
    match channels {
        1 => {
            let v = source[offset];
            [v, v, v, u8::MAX]
        }
        3 => [source[offset], source[offset + 1], source[offset + 2], u8::MAX],
        _ => [
            source[offset],
            source[offset + 1],
            source[offset + 2],
            source[offset + 3],
        ],
    }
}

fn image_statistics(layer: &Layer) -> Result<LayerStatistics, ViewerError> {
    let LayerData::Image { pixels, .. } = &layer.data else {
        return Err(ViewerError::UnsupportedLayer {
            message: format!("'{}' is not an image layer", layer.name),
            location: ErrorLocation::from(Location::caller()),
        });
    };
    if pixels.is_empty() {
        return Err(ViewerError::UnsupportedLayer {
            message: format!("'{}' has no pixel data", layer.name),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut min = f64::MAX;
    let mut max = f64::MIN;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for &value in pixels {
        let v = value as f64;
        min = min.min(v);
        max = max.max(v);
        sum += v;
        sum_sq += v * v;
    }
    let count = pixels.len() as f64;
    let mean = sum / count;
    let variance = (sum_sq / count - mean * mean).max(0.0);
    Ok(LayerStatistics {
        min,
        max,
        mean,
        std: variance.sqrt(),
    })
}
