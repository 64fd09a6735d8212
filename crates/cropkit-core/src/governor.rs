//! Size and media type admission.
//!
//! Both the uploaded file and the cropped PNG are compared against a byte
//! ceiling. Rejections are always reported; an oversized artifact is dropped,
//! never re-encoded at a lower quality.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the admission checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Declared media type is not `image/*`.
    #[error("Only image files are supported.")]
    NotAnImage { mime_type: String },

    /// Media type is an image but not in the accepted set.
    #[error("Unsupported image type: {mime_type}")]
    UnsupportedType { mime_type: String },

    /// File picked in the upload widget is over the ceiling.
    #[error("File size exceeds the limit of {}.", limit_text(.limit))]
    InputTooLarge { size: u64, limit: u64 },

    /// Image handed to the cropper is over the ceiling.
    #[error("Image size exceeds the limit of {} KB", kilobytes(.limit))]
    ImageTooLarge { size: u64, limit: u64 },

    /// Cropped output is over the ceiling.
    #[error("Cropped image size exceeds the limit of {}.", limit_text(.limit))]
    OutputTooLarge { size: u64, limit: u64 },
}

pub(crate) fn limit_text(limit: &u64) -> String {
    format_bytes(*limit)
}

fn kilobytes(limit: &u64) -> u64 {
    (*limit as f64 / 1024.0).round() as u64
}

/// Positive byte ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SizeLimit(u64);

impl SizeLimit {
    /// Cropper default: 2 MiB.
    pub const CROPPER_DEFAULT: SizeLimit = SizeLimit(2 * 1024 * 1024);
    /// Upload-only widget default: 5 MiB.
    pub const UPLOAD_DEFAULT: SizeLimit = SizeLimit(5 * 1024 * 1024);

    /// Create a limit, returning `None` for zero.
    pub fn new(bytes: u64) -> Option<Self> {
        (bytes > 0).then_some(Self(bytes))
    }

    /// Create a limit from a megabyte value as typed into the config form.
    pub fn from_megabytes(mb: f64) -> Option<Self> {
        if !mb.is_finite() || mb <= 0.0 {
            return None;
        }
        Self::new((mb * 1024.0 * 1024.0).round() as u64)
    }

    pub fn bytes(self) -> u64 {
        self.0
    }

    /// Whether `size` fits under this limit (inclusive).
    pub fn admits(self, size: u64) -> bool {
        size <= self.0
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::CROPPER_DEFAULT
    }
}

impl TryFrom<u64> for SizeLimit {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        SizeLimit::new(value).ok_or_else(|| "Size limit must be positive".to_string())
    }
}

impl From<SizeLimit> for u64 {
    fn from(limit: SizeLimit) -> Self {
        limit.0
    }
}

/// Check an image handed to the cropper before decoding.
///
/// The media type is checked first so a huge non-image reports the type
/// problem rather than the size.
pub fn check_input(
    byte_size: u64,
    mime_type: &str,
    accepted_types: &[String],
    limit: SizeLimit,
) -> Result<(), ValidationError> {
    check_media_type(mime_type, accepted_types)?;
    if !limit.admits(byte_size) {
        log::warn!(
            "Rejected image of {} (limit {})",
            format_bytes(byte_size),
            format_bytes(limit.bytes())
        );
        return Err(ValidationError::ImageTooLarge {
            size: byte_size,
            limit: limit.bytes(),
        });
    }
    Ok(())
}

/// Check an encoded crop result.
pub fn check_output(byte_size: u64, limit: SizeLimit) -> Result<(), ValidationError> {
    if limit.admits(byte_size) {
        Ok(())
    } else {
        log::warn!(
            "Discarded crop of {} (limit {})",
            format_bytes(byte_size),
            format_bytes(limit.bytes())
        );
        Err(ValidationError::OutputTooLarge {
            size: byte_size,
            limit: limit.bytes(),
        })
    }
}

/// Media type admission. An empty accepted list admits any `image/*` type.
pub fn check_media_type(mime_type: &str, accepted_types: &[String]) -> Result<(), ValidationError> {
    let normalized = mime_type.trim().to_ascii_lowercase();
    if !normalized.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    if !accepted_types.is_empty() && !accepted_types.iter().any(|t| t.eq_ignore_ascii_case(&normalized)) {
        return Err(ValidationError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }
    Ok(())
}

/// Outcome of [`validate_image_file`], shaped for display next to the drop zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Validate a picked file: it must be an image and within `limit`.
///
/// Unlike [`check_input`] this does not consult an accepted-type list; the
/// file picker already filters by type.
pub fn validate_image_file(byte_size: u64, mime_type: &str, limit: SizeLimit) -> FileValidation {
    let checked = check_media_type(mime_type, &[]).and_then(|()| {
        if limit.admits(byte_size) {
            Ok(())
        } else {
            log::warn!(
                "Rejected upload of {} (limit {})",
                format_bytes(byte_size),
                format_bytes(limit.bytes())
            );
            Err(ValidationError::InputTooLarge {
                size: byte_size,
                limit: limit.bytes(),
            })
        }
    });
    match checked {
        Ok(()) => FileValidation {
            valid: true,
            message: None,
        },
        Err(e) => FileValidation {
            valid: false,
            message: Some(e.to_string()),
        },
    }
}

/// Format a byte count for humans, e.g. `2 MB` or `1.5 KB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}
