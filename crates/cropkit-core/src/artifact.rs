//! The encoded result of a successful crop.

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use crate::encode::PNG_MIME_TYPE;

/// File name given to every cropped output.
pub const CROPPED_FILE_NAME: &str = "cropped-image.png";

/// PNG bytes of a committed crop plus the output size they were rendered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedArtifact {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl CroppedArtifact {
    pub fn new(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Encoded size; this is what the output size limit is checked against.
    pub fn byte_size(&self) -> u64 {
        self.png.len() as u64
    }

    pub fn mime_type(&self) -> &'static str {
        PNG_MIME_TYPE
    }

    /// `data:image/png;base64,...` form used for previews.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            PNG_MIME_TYPE,
            general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// File-like handle for uploading the crop.
    pub fn file(&self) -> CroppedFile {
        CroppedFile {
            name: CROPPED_FILE_NAME.to_string(),
            mime_type: PNG_MIME_TYPE.to_string(),
            bytes: self.png.clone(),
        }
    }
}

/// Named binary payload handed to the completion handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CroppedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
