//! Image intake for the cropper.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG, GIF and WebP uploads to RGBA
//! - Applying EXIF orientation the way a browser would
//! - Wrapping the raster in a shareable `ImageResource`
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::decode_resource;
//!
//! let bytes = std::fs::read("avatar.png").unwrap();
//! let resource = decode_resource(&bytes, "image/png").unwrap();
//! println!("Decoded {}x{} image", resource.width(), resource.height());
//! ```

mod reader;
mod types;

pub use reader::{decode_image, decode_resource};
pub use types::{DecodeError, DecodedImage, ImageResource, Orientation};
