//! Error types surfaced at the crop session boundary.
//!
//! Every failure is recoverable: the session keeps its pre-operation state
//! and the caller shows the message. Nothing is retried automatically.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::geometry::GeometryError;
use crate::governor::{limit_text, ValidationError};
use crate::session::SessionPhase;

/// Failure to obtain or use a platform resource (surface, decoder, encoder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// Drawing surface or mask buffer could not be allocated.
    #[error("Could not acquire a {width}x{height} drawing surface")]
    SurfaceUnavailable { width: u32, height: u32 },

    /// Shape mask produced no drawable path.
    #[error("Could not build the {0} mask path")]
    MaskPath(&'static str),

    /// Uploaded bytes could not be decoded.
    #[error("Failed to load the image: {0}")]
    Decode(#[from] DecodeError),

    /// Output could not be encoded.
    #[error("Failed to encode the cropped image: {0}")]
    Encode(#[from] EncodeError),
}

/// Errors returned by [`CropSession`](crate::session::CropSession) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// Wrong media type or file over the size limit.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No usable crop region or image transform.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Surface, decode or encode failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Cropped artifact is over the size limit and was discarded.
    #[error("Cropped image size exceeds the limit of {}", limit_text(.limit))]
    SizeExceeded { size: u64, limit: u64 },

    /// A crop commit is already pending.
    #[error("A crop operation is already in progress")]
    InProgress,

    /// The operation is not available in the current phase.
    #[error("Cannot {operation} while the session is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },
}

impl CropError {
    /// Output-size rejections become `SizeExceeded`; everything else is wrapped.
    pub(crate) fn from_output_check(err: ValidationError) -> Self {
        match err {
            ValidationError::OutputTooLarge { size, limit } => CropError::SizeExceeded { size, limit },
            other => CropError::Validation(other),
        }
    }
}

impl From<DecodeError> for CropError {
    fn from(err: DecodeError) -> Self {
        CropError::Resource(ResourceError::Decode(err))
    }
}

impl From<EncodeError> for CropError {
    fn from(err: EncodeError) -> Self {
        CropError::Resource(ResourceError::Encode(err))
    }
}
