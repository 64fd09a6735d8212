//! Conversion of mask descriptors to `tiny_skia` paths.

use tiny_skia::{Path, PathBuilder, Rect};

use super::ShapeMask;

/// Cubic Bézier handle length for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Build the fill path for a mask. Returns `None` for a degenerate shape.
pub fn build_path(mask: &ShapeMask) -> Option<Path> {
    match *mask {
        ShapeMask::Full { width, height } => {
            let rect = Rect::from_xywh(0.0, 0.0, width as f32, height as f32)?;
            Some(PathBuilder::from_rect(rect))
        }
        ShapeMask::Disk {
            center_x,
            center_y,
            radius,
        } => PathBuilder::from_circle(center_x as f32, center_y as f32, radius as f32),
        ShapeMask::RoundedRect {
            width,
            height,
            radius,
        } => rounded_rect_path(width as f32, height as f32, radius as f32),
    }
}

/// Rounded rectangle at the origin: straight edges joined by quarter circles.
fn rounded_rect_path(w: f32, h: f32, r: f32) -> Option<Path> {
    let r = r.clamp(0.0, w.min(h) / 2.0);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(0.0, 0.0, w, h)?));
    }
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(w - r, 0.0);
    // Top-right
    pb.cubic_to(w - r + k, 0.0, w, r - k, w, r);
    pb.line_to(w, h - r);
    // Bottom-right
    pb.cubic_to(w, h - r + k, w - r + k, h, w - r, h);
    pb.line_to(r, h);
    // Bottom-left
    pb.cubic_to(r - k, h, 0.0, h - r + k, 0.0, h - r);
    pb.line_to(0.0, r);
    // Top-left
    pb.cubic_to(0.0, r - k, r - k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_bounds() {
        let path = build_path(&ShapeMask::Full {
            width: 30.0,
            height: 20.0,
        })
        .unwrap();
        let bounds = path.bounds();
        assert_eq!((bounds.width(), bounds.height()), (30.0, 20.0));
    }

    #[test]
    fn test_disk_path_bounds() {
        let path = build_path(&ShapeMask::Disk {
            center_x: 50.0,
            center_y: 40.0,
            radius: 10.0,
        })
        .unwrap();
        let bounds = path.bounds();
        assert!((bounds.left() - 40.0).abs() < 0.01);
        assert!((bounds.right() - 60.0).abs() < 0.01);
        assert!((bounds.top() - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_rounded_rect_path_bounds() {
        let path = build_path(&ShapeMask::RoundedRect {
            width: 300.0,
            height: 150.0,
            radius: 20.0,
        })
        .unwrap();
        let bounds = path.bounds();
        assert!(bounds.left().abs() < 0.01);
        assert!(bounds.top().abs() < 0.01);
        assert!((bounds.width() - 300.0).abs() < 0.01);
        assert!((bounds.height() - 150.0).abs() < 0.01);
    }
}
