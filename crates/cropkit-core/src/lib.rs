//! Cropkit Core - crop geometry and compositing library
//!
//! This crate provides the core functionality behind the Cropkit image cropper
//! widget: mapping an on-screen crop region to source pixels, resampling those
//! pixels into a fixed-size output, clipping the output to a circle or rounded
//! rectangle, and sequencing the whole flow in a crop session.
//!
//! # Pipeline
//!
//! 1. `decode` - intake of the uploaded bytes into an RGBA raster
//! 2. `scene` - fit-to-surface transform and the editable crop region
//! 3. `geometry` - region (display space) to source rectangle (pixel space)
//! 4. `compose` - bilinear resample into the output surface + shape mask
//! 5. `encode` - PNG encoding of the masked surface
//! 6. `governor` - input/output byte size and media type checks
//!
//! `session` ties these together into the Empty/Editing/Cropped state machine.

pub mod artifact;
pub mod compose;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod governor;
pub mod mask;
pub mod scene;
pub mod session;

pub use artifact::{CroppedArtifact, CroppedFile};
pub use config::{CropConfig, DimensionPreset, UploadConfig};
pub use error::CropError;
pub use geometry::{map_to_source, CropRegion, SourceRect, Transform2D};
pub use governor::{format_bytes, validate_image_file, SizeLimit};
pub use mask::ShapeMask;
pub use scene::Scene;
pub use session::{CommitJob, CommitOutcome, CommitStatus, CropSession, SessionPhase};

/// Shape of the crop output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropShape {
    /// Disk inscribed in the output rectangle.
    Circle,
    /// Square overlay, optionally with rounded corners.
    #[default]
    Square,
    /// Rectangle following the output aspect ratio, optionally with rounded corners.
    Rectangle,
}

impl CropShape {
    /// Whether the shape honours a corner radius.
    pub fn supports_corner_radius(self) -> bool {
        !matches!(self, CropShape::Circle)
    }

    /// Lowercase name used in configuration objects.
    pub fn as_str(self) -> &'static str {
        match self {
            CropShape::Circle => "circle",
            CropShape::Square => "square",
            CropShape::Rectangle => "rectangle",
        }
    }
}

impl std::str::FromStr for CropShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(CropShape::Circle),
            "square" => Ok(CropShape::Square),
            "rectangle" => Ok(CropShape::Rectangle),
            other => Err(format!("Unknown crop shape: {}", other)),
        }
    }
}

/// Exact pixel size of the produced crop. Both sides are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct OutputDimensions {
    width: u32,
    height: u32,
}

#[derive(serde::Deserialize)]
struct RawDimensions {
    width: u32,
    height: u32,
}

impl TryFrom<RawDimensions> for OutputDimensions {
    type Error = String;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        OutputDimensions::new(raw.width, raw.height).ok_or_else(|| {
            format!(
                "Output dimensions must be positive, got {}x{}",
                raw.width, raw.height
            )
        })
    }
}

impl Default for OutputDimensions {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
        }
    }
}

impl OutputDimensions {
    /// Create output dimensions, returning `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Largest corner radius that still fits the output.
    pub fn max_corner_radius(&self) -> f64 {
        self.width.min(self.height) as f64 / 2.0
    }

    /// Total number of output pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether a drawing surface of this size can be allocated.
    ///
    /// Mirrors browser canvas limits: at most [`MAX_SURFACE_SIDE`] per side
    /// and [`MAX_SURFACE_PIXELS`] in total.
    pub fn fits_surface(&self) -> bool {
        self.width <= MAX_SURFACE_SIDE
            && self.height <= MAX_SURFACE_SIDE
            && self.pixel_count() <= MAX_SURFACE_PIXELS
    }
}

/// Longest side of a drawing surface, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 16_384;

/// Largest drawing surface area, in pixels (256 MiB of RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 67_108_864;
