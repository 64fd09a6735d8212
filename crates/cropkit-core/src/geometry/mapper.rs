//! Display-space region to source-pixel rectangle.
//!
//! ```text
//! center = (region.center - transform.offset) / transform.scale + image_size / 2
//! extent = region.size / transform.scale
//! origin = center - extent / 2
//! ```
//!
//! The result is not clamped to the image. A region dragged past the edge
//! maps to a rectangle that extends outside the source; the compositor
//! treats everything outside the source as transparent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CropRegion, Transform2D};

/// Errors raised while mapping a region to source pixels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Commit requested with no crop region on the surface.
    #[error("Please upload an image and adjust the crop area")]
    NoCropRegion,

    /// Image transform cannot be inverted.
    #[error("Invalid image transform (scale {scale})")]
    InvalidTransform { scale: f64 },

    /// Region has a non-finite position or a non-positive size.
    #[error("Crop region is empty or not finite")]
    EmptyRegion,
}

/// Axis-aligned rectangle in source pixels, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width`x`height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rectangle lies entirely inside a `width`x`height` image.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width as f64 && self.bottom() <= height as f64
    }
}

/// Map the crop region to the source rectangle it covers.
///
/// # Arguments
///
/// * `image_width`, `image_height` - Intrinsic size of the source image
/// * `transform` - Placement of the image on the surface
/// * `region` - Crop overlay in display coordinates
///
/// # Errors
///
/// `GeometryError::InvalidTransform` if the scale is zero, negative or not
/// finite; `GeometryError::EmptyRegion` for a degenerate region.
pub fn map_to_source(
    image_width: u32,
    image_height: u32,
    transform: &Transform2D,
    region: &CropRegion,
) -> Result<SourceRect, GeometryError> {
    if !transform.is_valid() {
        return Err(GeometryError::InvalidTransform {
            scale: transform.scale,
        });
    }
    if !region.is_valid() {
        return Err(GeometryError::EmptyRegion);
    }

    let center = transform.to_source(region.center(), image_width, image_height);
    let (region_w, region_h) = region.size();
    let width = region_w / transform.scale;
    let height = region_h / transform.scale;

    Ok(SourceRect::new(
        center.x - width / 2.0,
        center.y - height / 2.0,
        width,
        height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{default_region, fit_to_surface, Point, SurfaceSize};
    use crate::{CropShape, OutputDimensions};

    #[test]
    fn test_identity_transform() {
        let t = Transform2D::new(1.0, Point::new(50.0, 50.0));
        let region = CropRegion::rect(Point::new(50.0, 50.0), 20.0, 10.0, 0.0);
        let rect = map_to_source(100, 100, &t, &region).unwrap();
        assert_eq!(rect, SourceRect::new(40.0, 45.0, 20.0, 10.0));
    }

    #[test]
    fn test_scaled_image() {
        // Image shown at half size, centered at (200, 200)
        let t = Transform2D::new(0.5, Point::new(200.0, 200.0));
        let region = CropRegion::circle(Point::new(210.0, 190.0), 25.0);
        let rect = map_to_source(400, 300, &t, &region).unwrap();

        // Center: (10 / 0.5 + 200, -10 / 0.5 + 150) = (220, 130); extent 100
        assert_eq!(rect, SourceRect::new(170.0, 80.0, 100.0, 100.0));
    }

    #[test]
    fn test_default_region_maps_to_80_percent_of_source() {
        let t = fit_to_surface(1000, 800, SurfaceSize::default());
        let dims = OutputDimensions::new(300, 150).unwrap();
        let region = default_region(CropShape::Rectangle, dims, 20.0, 1000, 800, &t);
        let rect = map_to_source(1000, 800, &t, &region).unwrap();

        assert!((rect.width - 640.0).abs() < 1e-6);
        assert!((rect.height - 320.0).abs() < 1e-6);
        let (cx, cy) = rect.center();
        assert!((cx - 500.0).abs() < 1e-6);
        assert!((cy - 400.0).abs() < 1e-6);
        assert!(rect.is_within(1000, 800));
    }

    #[test]
    fn test_region_outside_bounds_is_not_clamped() {
        let t = Transform2D::new(1.0, Point::new(50.0, 50.0));
        let region = CropRegion::rect(Point::new(0.0, 0.0), 40.0, 40.0, 0.0);
        let rect = map_to_source(100, 100, &t, &region).unwrap();
        assert_eq!(rect, SourceRect::new(-20.0, -20.0, 40.0, 40.0));
        assert!(!rect.is_within(100, 100));
    }

    #[test]
    fn test_invalid_transform() {
        let t = Transform2D::new(0.0, Point::default());
        let region = CropRegion::circle(Point::default(), 5.0);
        assert_eq!(
            map_to_source(10, 10, &t, &region),
            Err(GeometryError::InvalidTransform { scale: 0.0 })
        );
    }

    #[test]
    fn test_empty_region() {
        let t = Transform2D::identity();
        let region = CropRegion::rect(Point::default(), 0.0, 10.0, 0.0);
        assert_eq!(map_to_source(10, 10, &t, &region), Err(GeometryError::EmptyRegion));
    }

    #[test]
    fn test_full_rect() {
        let rect = SourceRect::full(30, 20);
        assert_eq!((rect.right(), rect.bottom()), (30.0, 20.0));
        assert!(rect.is_within(30, 20));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
