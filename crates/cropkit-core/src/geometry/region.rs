//! The crop region overlay.
//!
//! A region is an immutable value in display space. Every edit (drag,
//! resize, shape change) produces a new region instead of mutating the old
//! one.

use serde::{Deserialize, Serialize};

use super::{Point, Transform2D};
use crate::{CropShape, OutputDimensions};

/// Smallest width/height a region can be resized to, in display pixels.
pub const MIN_REGION_EXTENT: f64 = 1.0;

/// Fraction of the displayed image's smaller side covered by a new region.
const DEFAULT_COVERAGE: f64 = 0.8;

/// Shape-typed overlay positioned over the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CropRegion {
    /// Circle overlay.
    Circle { center: Point, radius: f64 },
    /// Rectangle overlay, optionally with rounded corners.
    Rect {
        center: Point,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
}

impl CropRegion {
    pub fn circle(center: Point, radius: f64) -> Self {
        CropRegion::Circle { center, radius }
    }

    /// Rectangle overlay. The corner radius is clamped to half the smaller side.
    pub fn rect(center: Point, width: f64, height: f64, corner_radius: f64) -> Self {
        CropRegion::Rect {
            center,
            width,
            height,
            corner_radius: clamp_radius(corner_radius, width, height),
        }
    }

    pub fn center(&self) -> Point {
        match *self {
            CropRegion::Circle { center, .. } | CropRegion::Rect { center, .. } => center,
        }
    }

    /// Bounding box size `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        match *self {
            CropRegion::Circle { radius, .. } => (radius * 2.0, radius * 2.0),
            CropRegion::Rect { width, height, .. } => (width, height),
        }
    }

    /// Corner radius of the overlay outline; zero for circles.
    pub fn corner_radius(&self) -> f64 {
        match *self {
            CropRegion::Circle { .. } => 0.0,
            CropRegion::Rect { corner_radius, .. } => corner_radius,
        }
    }

    /// Finite center and strictly positive extent.
    pub fn is_valid(&self) -> bool {
        let center = self.center();
        let (w, h) = self.size();
        center.x.is_finite() && center.y.is_finite() && w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }

    /// Region moved by a drag delta.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        self.with_center(self.center().translated(dx, dy))
    }

    /// Region moved to a new center.
    pub fn with_center(&self, center: Point) -> Self {
        match *self {
            CropRegion::Circle { radius, .. } => CropRegion::Circle { center, radius },
            CropRegion::Rect {
                width,
                height,
                corner_radius,
                ..
            } => CropRegion::Rect {
                center,
                width,
                height,
                corner_radius,
            },
        }
    }

    /// Region uniformly scaled about its center.
    ///
    /// The aspect ratio is preserved and neither side drops below
    /// [`MIN_REGION_EXTENT`]. Non-finite or non-positive factors leave the
    /// region unchanged.
    pub fn scaled(&self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let (w, h) = self.size();
        let smaller = w.min(h);
        let factor = if smaller * factor < MIN_REGION_EXTENT && smaller > 0.0 {
            MIN_REGION_EXTENT / smaller
        } else {
            factor
        };

        match *self {
            CropRegion::Circle { center, radius } => CropRegion::Circle {
                center,
                radius: radius * factor,
            },
            CropRegion::Rect {
                center,
                width,
                height,
                corner_radius,
            } => CropRegion::rect(center, width * factor, height * factor, corner_radius),
        }
    }
}

fn clamp_radius(radius: f64, width: f64, height: f64) -> f64 {
    if !radius.is_finite() {
        return 0.0;
    }
    radius.clamp(0.0, (width.min(height) / 2.0).max(0.0))
}

/// Build the region shown right after an image is loaded or the shape,
/// output size or corner radius changes.
///
/// The region is centered on the displayed image and its longer side spans
/// 80% of the displayed image's smaller side. Rectangles follow the output
/// aspect ratio; squares and circles are 1:1.
pub fn default_region(
    shape: CropShape,
    dimensions: OutputDimensions,
    corner_radius: f64,
    image_width: u32,
    image_height: u32,
    transform: &Transform2D,
) -> CropRegion {
    let (display_w, display_h) = transform.displayed_size(image_width, image_height);
    let basis = display_w.min(display_h) * DEFAULT_COVERAGE;
    let center = transform.offset;

    match shape {
        CropShape::Circle => CropRegion::circle(center, basis / 2.0),
        CropShape::Square => CropRegion::rect(center, basis, basis, corner_radius),
        CropShape::Rectangle => {
            let aspect = dimensions.aspect_ratio();
            let (w, h) = if aspect >= 1.0 {
                (basis, basis / aspect)
            } else {
                (basis * aspect, basis)
            };
            CropRegion::rect(center, w, h, corner_radius)
        }
    }
}
