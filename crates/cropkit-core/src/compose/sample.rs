//! Bilinear sampling of a straight-alpha raster into premultiplied RGBA.

use crate::decode::DecodedImage;

/// Premultiplied RGBA in `[0, 255]`.
pub type Premultiplied = [f64; 4];

const TRANSPARENT: Premultiplied = [0.0; 4];

/// Sample `image` at continuous source coordinates `(x, y)`.
///
/// Pixel `(i, j)` covers `[i, i+1) x [j, j+1)` with its center at
/// `(i + 0.5, j + 0.5)`. Points outside `[0, w] x [0, h]` are transparent.
/// Inside, neighbors past the edge repeat the edge pixel so the border
/// does not fade.
///
/// Interpolation happens on premultiplied values, so transparent pixels do
/// not bleed their color into opaque neighbors.
pub fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> Premultiplied {
    let (w, h) = (image.width as f64, image.height as f64);
    if image.is_empty() || !(0.0..=w).contains(&x) || !(0.0..=h).contains(&y) {
        return TRANSPARENT;
    }

    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let max_x = image.width as i64 - 1;
    let max_y = image.height as i64 - 1;
    let clamp_x = |v: i64| v.clamp(0, max_x) as u32;
    let clamp_y = |v: i64| v.clamp(0, max_y) as u32;

    let (xa, xb) = (clamp_x(x0 as i64), clamp_x(x0 as i64 + 1));
    let (ya, yb) = (clamp_y(y0 as i64), clamp_y(y0 as i64 + 1));

    let p00 = premultiplied(image, xa, ya);
    let p10 = premultiplied(image, xb, ya);
    let p01 = premultiplied(image, xa, yb);
    let p11 = premultiplied(image, xb, yb);

    let mut result = TRANSPARENT;
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - tx) * (1.0 - ty)
            + p10[i] * tx * (1.0 - ty)
            + p01[i] * (1.0 - tx) * ty
            + p11[i] * tx * ty;
    }
    result
}

#[inline]
fn premultiplied(image: &DecodedImage, x: u32, y: u32) -> Premultiplied {
    let [r, g, b, a] = image.pixel(x, y);
    let alpha = a as f64 / 255.0;
    [
        r as f64 * alpha,
        g as f64 * alpha,
        b as f64 * alpha,
        a as f64,
    ]
}

/// Quantize a premultiplied sample to bytes, keeping color <= alpha.
pub fn to_bytes(sample: Premultiplied) -> [u8; 4] {
    let a = sample[3].clamp(0.0, 255.0).round() as u8;
    let channel = |v: f64| (v.clamp(0.0, 255.0).round() as u8).min(a);
    [channel(sample[0]), channel(sample[1]), channel(sample[2]), a]
}
