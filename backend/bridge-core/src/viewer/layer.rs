use std::path::PathBuf;

/// Placeholder raster size for file-backed layers. Format loaders live
/// outside this crate; the bridge records the source path and synthesizes
/// pixel data so styling and statistics operations stay exercisable.
const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_CHANNELS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Image,
    Points,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Image => "image",
            LayerKind::Points => "points",
        }
    }
}

#[derive(Debug, Clone)]
pub enum LayerData {
    Image {
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    },
    Points {
        coordinates: Vec<Vec<f64>>,
    },
}

/// One entry in the viewer's layer list.
///
/// Styling attributes mirror what the catalog operations can touch:
/// visibility, opacity, colormap, contrast limits, gamma.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    pub opacity: f64,
    pub colormap: String,
    pub contrast_limits: (f64, f64),
    pub gamma: f64,
    pub source: Option<PathBuf>,
    pub data: LayerData,
}

impl Layer {
    pub fn image(
        name: String,
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
        source: Option<PathBuf>,
    ) -> Self {
        Self {
            name,
            visible: true,
            opacity: 1.0,
            colormap: String::from("gray"),
            contrast_limits: (0.0, 255.0),
            gamma: 1.0,
            source,
            data: LayerData::Image {
                width,
                height,
                channels,
                pixels,
            },
        }
    }

    /// File-backed layer with a synthetic gradient raster standing in for
    /// the decoded file contents.
    pub fn from_file(name: String, source: PathBuf) -> Self {
        let (w, h, c) = (
            PLACEHOLDER_SIZE,
            PLACEHOLDER_SIZE,
            PLACEHOLDER_CHANNELS as u32,
        );
        let mut pixels = Vec::with_capacity((w * h * c) as usize);
        for y in 0..h {
            for x in 0..w {
                let value = ((x + y) % 256) as u8;
                pixels.extend_from_slice(&[value, value, value, u8::MAX]);
            }
        }
        Self::image(name, w, h, PLACEHOLDER_CHANNELS, pixels, Some(source))
    }

    pub fn points(name: String, coordinates: Vec<Vec<f64>>) -> Self {
        Self {
            name,
            visible: true,
            opacity: 1.0,
            colormap: String::from("gray"),
            contrast_limits: (0.0, 1.0),
            gamma: 1.0,
            source: None,
            data: LayerData::Points { coordinates },
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self.data {
            LayerData::Image { .. } => LayerKind::Image,
            LayerData::Points { .. } => LayerKind::Points,
        }
    }
}
