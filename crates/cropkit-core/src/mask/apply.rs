//! Mask application on a premultiplied `tiny_skia` surface.
//!
//! - Disk masks multiply every pixel by the anti-aliased disk coverage, the
//!   same result as filling the disk with a destination-in blend over the
//!   whole surface.
//! - Rounded rectangles snapshot the surface, clear it, and draw the
//!   snapshot back through a clip mask.

use tiny_skia::{Color, FillRule, Mask, Pixmap, PixmapPaint, Transform};

use super::{build_path, MaskMode, ShapeMask};
use crate::error::ResourceError;

/// Apply `mask` to `surface` in place.
///
/// # Errors
///
/// `ResourceError::SurfaceUnavailable` if the mask buffer cannot be
/// allocated, `ResourceError::MaskPath` if the shape has no drawable path.
pub fn apply_mask(surface: &mut Pixmap, mask: &ShapeMask) -> Result<(), ResourceError> {
    let mode = mask.mode();
    if mode == MaskMode::None {
        return Ok(());
    }

    let coverage = coverage_mask(surface.width(), surface.height(), mask)?;

    match mode {
        MaskMode::None => {}
        MaskMode::AlphaIntersect => intersect_alpha(surface, &coverage),
        MaskMode::Clip => {
            let snapshot = surface.clone();
            surface.fill(Color::TRANSPARENT);
            surface.draw_pixmap(
                0,
                0,
                snapshot.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                Some(&coverage),
            );
        }
    }

    Ok(())
}

/// Rasterize the mask shape into an anti-aliased 8-bit coverage buffer.
fn coverage_mask(width: u32, height: u32, mask: &ShapeMask) -> Result<Mask, ResourceError> {
    let path = build_path(mask).ok_or(ResourceError::MaskPath(mask_name(mask)))?;
    let mut coverage =
        Mask::new(width, height).ok_or(ResourceError::SurfaceUnavailable { width, height })?;
    coverage.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Ok(coverage)
}

/// Destination-in: keep the surface only where the mask is opaque.
fn intersect_alpha(surface: &mut Pixmap, coverage: &Mask) {
    for (px, &cov) in surface.data_mut().chunks_exact_mut(4).zip(coverage.data()) {
        match cov {
            255 => {}
            0 => px.fill(0),
            _ => {
                for channel in px.iter_mut() {
                    *channel = ((*channel as u16 * cov as u16 + 127) / 255) as u8;
                }
            }
        }
    }
}

fn mask_name(mask: &ShapeMask) -> &'static str {
    match mask {
        ShapeMask::Full { .. } => "rectangle",
        ShapeMask::Disk { .. } => "circle",
        ShapeMask::RoundedRect { .. } => "rounded rectangle",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{CropShape, OutputDimensions};
    use proptest::prelude::*;

    fn shape_strategy() -> impl Strategy<Value = CropShape> {
        prop_oneof![
            Just(CropShape::Circle),
            Just(CropShape::Square),
            Just(CropShape::Rectangle),
        ]
    }

    /// Pixel square `[x, x+1] x [y, y+1]` lies entirely inside the boundary.
    fn pixel_inside(mask: &ShapeMask, x: f64, y: f64) -> bool {
        [(x, y), (x + 1.0, y), (x, y + 1.0), (x + 1.0, y + 1.0)]
            .iter()
            .all(|&(px, py)| mask.contains(px, py))
    }

    /// No point of a half-pixel grid around the pixel touches the shape.
    fn pixel_clear(mask: &ShapeMask, x: f64, y: f64) -> bool {
        (0..5).all(|i| {
            (0..5).all(|j| !mask.contains(x - 0.5 + i as f64 * 0.5, y - 0.5 + j as f64 * 0.5))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: rasterized coverage agrees with the geometric boundary.
        #[test]
        fn prop_coverage_matches_boundary(
            shape in shape_strategy(),
            (w, h) in (8u32..64, 8u32..64),
            radius in 0.0f64..40.0,
        ) {
            let mask = ShapeMask::generate(shape, OutputDimensions::new(w, h).unwrap(), radius);
            let mut surface = Pixmap::new(w, h).unwrap();
            surface.fill(Color::WHITE);
            apply_mask(&mut surface, &mask).unwrap();

            for y in 0..h {
                for x in 0..w {
                    let alpha = surface.pixel(x, y).unwrap().alpha();
                    let (fx, fy) = (x as f64, y as f64);
                    if pixel_inside(&mask, fx, fy) {
                        prop_assert!(alpha >= 250, "inside ({}, {}) alpha {}", x, y, alpha);
                    } else if pixel_clear(&mask, fx, fy) {
                        prop_assert!(alpha <= 4, "outside ({}, {}) alpha {}", x, y, alpha);
                    }
                }
            }
        }
    }
}
