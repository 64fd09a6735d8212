//! Shape masks for the cropped output.
//!
//! A [`ShapeMask`] is a plain geometric descriptor in output pixel space. It
//! is turned into a `tiny_skia` path only when applied, so the descriptor
//! stays independent of whatever draws the overlay on screen.
//!
//! ## Mask Types
//!
//! - **Full**: no masking, the whole output rectangle is kept
//! - **Disk**: inscribed circle, applied as an alpha intersection
//!   (keep only where both surface and disk are opaque)
//! - **Rounded rectangle**: four quarter-circle corners joined by straight
//!   edges, applied as a clip while the surface is redrawn

mod apply;
mod path;

pub use apply::apply_mask;
pub use path::build_path;

use serde::{Deserialize, Serialize};

use crate::{CropShape, OutputDimensions};

/// How a mask is combined with the drawn surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Nothing to do.
    None,
    /// Multiply surface alpha by the mask coverage.
    AlphaIntersect,
    /// Redraw the surface through a clip region.
    Clip,
}

/// Mask descriptor in output pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeMask {
    /// Full output rectangle.
    Full { width: f64, height: f64 },
    /// Filled disk.
    Disk {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
    /// Rectangle at the origin with rounded corners.
    RoundedRect { width: f64, height: f64, radius: f64 },
}

impl ShapeMask {
    /// Build the mask for a shape and output size.
    ///
    /// The corner radius is clamped to `[0, min(w,h)/2]` here even if the
    /// caller already validated it. Circles ignore it.
    pub fn generate(shape: CropShape, dimensions: OutputDimensions, corner_radius: f64) -> Self {
        let width = dimensions.width() as f64;
        let height = dimensions.height() as f64;

        match shape {
            CropShape::Circle => ShapeMask::Disk {
                center_x: width / 2.0,
                center_y: height / 2.0,
                radius: width.min(height) / 2.0,
            },
            CropShape::Square | CropShape::Rectangle => {
                let radius = if corner_radius.is_finite() {
                    corner_radius.clamp(0.0, dimensions.max_corner_radius())
                } else {
                    0.0
                };
                if radius > 0.0 {
                    ShapeMask::RoundedRect {
                        width,
                        height,
                        radius,
                    }
                } else {
                    ShapeMask::Full { width, height }
                }
            }
        }
    }

    pub fn mode(&self) -> MaskMode {
        match self {
            ShapeMask::Full { .. } => MaskMode::None,
            ShapeMask::Disk { .. } => MaskMode::AlphaIntersect,
            ShapeMask::RoundedRect { .. } => MaskMode::Clip,
        }
    }

    /// Whether the point `(x, y)` lies inside the mask boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            ShapeMask::Full { width, height } => x >= 0.0 && y >= 0.0 && x <= width && y <= height,
            ShapeMask::Disk {
                center_x,
                center_y,
                radius,
            } => {
                let dx = x - center_x;
                let dy = y - center_y;
                dx * dx + dy * dy <= radius * radius
            }
            ShapeMask::RoundedRect {
                width,
                height,
                radius,
            } => {
                if x < 0.0 || y < 0.0 || x > width || y > height {
                    return false;
                }
                // Nearest corner-circle center; inside the cross it is the point itself
                let cx = x.clamp(radius, width - radius);
                let cy = y.clamp(radius, height - radius);
                let dx = x - cx;
                let dy = y - cy;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }

    /// Area enclosed by the mask boundary in square pixels.
    pub fn area(&self) -> f64 {
        use std::f64::consts::PI;
        match *self {
            ShapeMask::Full { width, height } => width * height,
            ShapeMask::Disk { radius, .. } => PI * radius * radius,
            ShapeMask::RoundedRect {
                width,
                height,
                radius,
            } => width * height - (4.0 - PI) * radius * radius,
        }
    }
}
