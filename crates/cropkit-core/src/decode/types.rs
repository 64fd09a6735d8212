//! Core types for image intake.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The bytes are not in a recognized image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoded raster has a zero-sized side.
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// The pixel buffer does not hold `width * height` RGBA pixels.
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferMismatch { expected: u64, actual: u64 },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image with straight-alpha RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Get the RGBA value at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Verify the raster is non-empty and its buffer matches its size.
    pub fn check_buffer(&self) -> Result<(), DecodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.pixel_count() * 4;
        let actual = self.pixels.len() as u64;
        if actual != expected {
            return Err(DecodeError::BufferMismatch { expected, actual });
        }
        Ok(())
    }
}

/// An uploaded image: the decoded raster plus what the file declared.
///
/// The raster is shared so a pending crop can hold on to it while the
/// session moves on. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ImageResource {
    image: Arc<DecodedImage>,
    byte_size: u64,
    mime_type: String,
}

impl ImageResource {
    /// Wrap a raster, rejecting empty images and short or long buffers.
    pub fn new(
        image: DecodedImage,
        byte_size: u64,
        mime_type: impl Into<String>,
    ) -> Result<Self, DecodeError> {
        image.check_buffer()?;
        Ok(Self {
            image: Arc::new(image),
            byte_size,
            mime_type: mime_type.into(),
        })
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Size of the original encoded file.
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
