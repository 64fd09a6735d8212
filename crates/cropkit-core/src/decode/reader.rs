//! Raster decoding with EXIF orientation handling.
//!
//! The format is guessed from the leading bytes rather than trusted from the
//! declared media type. Browsers apply the EXIF orientation tag when they draw
//! an image, so the decoded raster is rotated/flipped the same way.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodedImage, ImageResource, Orientation};

/// Decode image bytes (JPEG, PNG, GIF or WebP) into straight-alpha RGBA.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized,
/// `DecodeError::CorruptedFile` if decoding fails, and
/// `DecodeError::EmptyImage` for a zero-sized raster.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let orientation = extract_orientation(bytes);
    let oriented = apply_orientation(img, orientation);
    let rgba = oriented.into_rgba8();

    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    log::debug!(
        "Decoded {}x{} image ({} bytes, orientation {:?})",
        width,
        height,
        bytes.len(),
        orientation
    );

    Ok(DecodedImage::from_rgba_image(rgba))
}

/// Decode bytes and wrap them with the file's size and declared media type.
pub fn decode_resource(bytes: &[u8], mime_type: &str) -> Result<ImageResource, DecodeError> {
    let image = decode_image(bytes)?;
    ImageResource::new(image, bytes.len() as u64, mime_type)
}

/// Extract the EXIF orientation. Missing or unreadable EXIF means `Normal`.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
