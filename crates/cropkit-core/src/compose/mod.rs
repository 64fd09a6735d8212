//! Raster compositor.
//!
//! Resamples a source rectangle into an output surface of exactly the
//! configured size, then clips the surface with the shape mask:
//!
//! ```text
//! output(ox, oy) = sample(rect.x + (ox + 0.5) * rect.w / out_w,
//!                         rect.y + (oy + 0.5) * rect.h / out_h)
//! ```
//!
//! The surface is a premultiplied `tiny_skia::Pixmap`. The result is
//! converted back to straight-alpha RGBA for encoding.

mod sample;

pub use sample::sample_bilinear;

use tiny_skia::Pixmap;

use crate::decode::DecodedImage;
use crate::error::ResourceError;
use crate::geometry::SourceRect;
use crate::mask::{apply_mask, ShapeMask};
use crate::OutputDimensions;

/// Render `rect` of `image` into a `dimensions`-sized raster clipped by `mask`.
///
/// Areas of `rect` that fall outside the image are transparent.
///
/// # Errors
///
/// `ResourceError::SurfaceUnavailable` if the output surface is larger than
/// [`MAX_SURFACE_SIDE`](crate::MAX_SURFACE_SIDE) /
/// [`MAX_SURFACE_PIXELS`](crate::MAX_SURFACE_PIXELS) or cannot be allocated,
/// `ResourceError::Decode` if the source buffer does not match its size, or
/// any error from [`apply_mask`].
pub fn compose(
    image: &DecodedImage,
    rect: &SourceRect,
    dimensions: OutputDimensions,
    mask: &ShapeMask,
) -> Result<DecodedImage, ResourceError> {
    let (out_w, out_h) = (dimensions.width(), dimensions.height());

    if !dimensions.fits_surface() {
        log::warn!("Refusing to allocate a {}x{} output surface", out_w, out_h);
        return Err(ResourceError::SurfaceUnavailable {
            width: out_w,
            height: out_h,
        });
    }
    image.check_buffer()?;

    if !rect.is_within(image.width, image.height) {
        log::warn!(
            "Crop rectangle ({:.1}, {:.1}, {:.1}x{:.1}) extends past the {}x{} source; padding with transparency",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            image.width,
            image.height
        );
    }

    let mut surface = resample(image, rect, out_w, out_h)?;
    apply_mask(&mut surface, mask)?;

    Ok(surface_to_rgba(&surface))
}

/// Bilinear resample of `rect` into a fresh premultiplied surface.
fn resample(
    image: &DecodedImage,
    rect: &SourceRect,
    out_w: u32,
    out_h: u32,
) -> Result<Pixmap, ResourceError> {
    let mut surface = Pixmap::new(out_w, out_h).ok_or(ResourceError::SurfaceUnavailable {
        width: out_w,
        height: out_h,
    })?;

    let step_x = rect.width / out_w as f64;
    let step_y = rect.height / out_h as f64;
    let row_len = out_w as usize * 4;

    for (oy, row) in surface.data_mut().chunks_exact_mut(row_len).enumerate() {
        let sy = rect.y + (oy as f64 + 0.5) * step_y;
        for (ox, px) in row.chunks_exact_mut(4).enumerate() {
            let sx = rect.x + (ox as f64 + 0.5) * step_x;
            px.copy_from_slice(&sample::to_bytes(sample_bilinear(image, sx, sy)));
        }
    }

    Ok(surface)
}

/// Demultiply a surface into straight-alpha RGBA.
fn surface_to_rgba(surface: &Pixmap) -> DecodedImage {
    let mut pixels = Vec::with_capacity(surface.data().len());
    for px in surface.pixels() {
        let c = px.demultiply();
        pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    DecodedImage::new(surface.width(), surface.height(), pixels)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
