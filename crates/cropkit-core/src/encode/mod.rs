//! Output encoding for the cropper.
//!
//! The cropped surface keeps its alpha channel (circle and rounded-corner
//! masks produce transparent pixels), so the output is always PNG.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::encode::encode_png;
//!
//! let pixels = vec![255u8; 200 * 200 * 4]; // Opaque white
//! let png = encode_png(&pixels, 200, 200).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod png;

pub use png::{encode_png, EncodeError, PNG_MIME_TYPE};
