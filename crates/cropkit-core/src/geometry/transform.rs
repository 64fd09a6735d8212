//! Placement of a raster on the drawing surface.

use serde::{Deserialize, Serialize};

/// Fraction of the surface the fitted image may occupy.
pub const FIT_MARGIN: f64 = 0.9;

/// A point in display or source space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Size of the interactive drawing surface in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Uniform scale plus center-anchored offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Display pixels per source pixel
    pub scale: f64,
    /// Display position of the raster's center
    pub offset: Point,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn new(scale: f64, offset: Point) -> Self {
        Self { scale, offset }
    }

    /// Unit scale, centered at the origin.
    pub fn identity() -> Self {
        Self::new(1.0, Point::default())
    }

    /// A usable transform has a finite, positive scale and a finite offset.
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite()
            && self.scale > 0.0
            && self.offset.x.is_finite()
            && self.offset.y.is_finite()
    }

    /// On-screen size of a raster with the given intrinsic size.
    pub fn displayed_size(&self, width: u32, height: u32) -> (f64, f64) {
        (width as f64 * self.scale, height as f64 * self.scale)
    }

    /// Map a display point into the source space of a `width`x`height` raster.
    pub fn to_source(&self, point: Point, width: u32, height: u32) -> Point {
        Point::new(
            (point.x - self.offset.x) / self.scale + width as f64 / 2.0,
            (point.y - self.offset.y) / self.scale + height as f64 / 2.0,
        )
    }

    /// Map a source point onto the surface.
    pub fn to_display(&self, point: Point, width: u32, height: u32) -> Point {
        Point::new(
            (point.x - width as f64 / 2.0) * self.scale + self.offset.x,
            (point.y - height as f64 / 2.0) * self.scale + self.offset.y,
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.scale, self.offset.translated(dx, dy))
    }

    /// Multiply the scale, keeping the center in place.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.scale * factor, self.offset)
    }
}

/// Fit a raster inside the surface with a margin, centered.
///
/// `scale = min(surface_w / img_w, surface_h / img_h) * 0.9`
pub fn fit_to_surface(width: u32, height: u32, surface: SurfaceSize) -> Transform2D {
    let scale_x = surface.width / width.max(1) as f64;
    let scale_y = surface.height / height.max(1) as f64;
    Transform2D::new(scale_x.min(scale_y) * FIT_MARGIN, surface.center())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_landscape() {
        let t = fit_to_surface(1000, 800, SurfaceSize::default());
        // min(400/1000, 400/800) * 0.9 = 0.36
        assert!((t.scale - 0.36).abs() < 1e-12);
        assert_eq!(t.offset, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_fit_portrait() {
        let t = fit_to_surface(200, 800, SurfaceSize::new(400.0, 400.0));
        assert!((t.scale - 0.45).abs() < 1e-12);
        let (w, h) = t.displayed_size(200, 800);
        assert!((w - 90.0).abs() < 1e-9);
        assert!((h - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_small_image_upscales() {
        let t = fit_to_surface(40, 40, SurfaceSize::default());
        assert!((t.scale - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_source_display() {
        let t = Transform2D::new(0.5, Point::new(120.0, 80.0));
        let p = Point::new(37.0, 411.0);
        let back = t.to_source(t.to_display(p, 300, 900), 300, 900);
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_center_maps_to_image_center() {
        let t = fit_to_surface(1000, 800, SurfaceSize::default());
        let p = t.to_source(t.offset, 1000, 800);
        assert_eq!(p, Point::new(500.0, 400.0));
    }

    #[test]
    fn test_validity() {
        assert!(Transform2D::identity().is_valid());
        assert!(!Transform2D::new(0.0, Point::default()).is_valid());
        assert!(!Transform2D::new(f64::NAN, Point::default()).is_valid());
        assert!(!Transform2D::new(1.0, Point::new(f64::INFINITY, 0.0)).is_valid());
    }

    #[test]
    fn test_translate_and_scale() {
        let t = Transform2D::new(2.0, Point::new(10.0, 10.0))
            .translated(5.0, -3.0)
            .scaled(0.5);
        assert_eq!(t.offset, Point::new(15.0, 7.0));
        assert_eq!(t.scale, 1.0);
    }
}
