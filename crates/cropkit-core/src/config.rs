//! Widget configuration.
//!
//! `CropConfig` drives the cropper (shape, output size, corner radius and
//! byte limit). `UploadConfig` drives the plain upload widget, which accepts a
//! broader set of image types and a larger file.

use serde::{Deserialize, Serialize};

use crate::governor::SizeLimit;
use crate::{CropShape, OutputDimensions};

/// Media types accepted by the cropper.
pub const CROPPER_ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Media types accepted by the upload-only widget.
pub const UPLOAD_ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

fn cropper_accepted_types() -> Vec<String> {
    CROPPER_ACCEPTED_TYPES.iter().map(|s| s.to_string()).collect()
}

fn upload_accepted_types() -> Vec<String> {
    UPLOAD_ACCEPTED_TYPES.iter().map(|s| s.to_string()).collect()
}

/// Cropper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Output shape
    pub shape: CropShape,
    /// Exact output size in pixels
    pub dimensions: OutputDimensions,
    /// Corner radius in output pixels (ignored for circles)
    pub corner_radius: f64,
    /// Ceiling applied to both the uploaded file and the cropped PNG
    pub size_limit: SizeLimit,
    /// Accepted input media types
    pub accepted_types: Vec<String>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            shape: CropShape::default(),
            dimensions: OutputDimensions::default(),
            corner_radius: 0.0,
            size_limit: SizeLimit::CROPPER_DEFAULT,
            accepted_types: cropper_accepted_types(),
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corner radius actually used for masking, clamped to `[0, min(w,h)/2]`.
    ///
    /// Circles never carry a radius. Non-finite radii are treated as zero.
    pub fn effective_corner_radius(&self) -> f64 {
        if !self.shape.supports_corner_radius() || !self.corner_radius.is_finite() {
            return 0.0;
        }
        self.corner_radius
            .clamp(0.0, self.dimensions.max_corner_radius())
    }

    /// Change the shape. Switching to a circle resets the corner radius.
    pub fn set_shape(&mut self, shape: CropShape) {
        self.shape = shape;
        if shape == CropShape::Circle {
            self.corner_radius = 0.0;
        }
    }

    /// Apply one of the dimension presets.
    pub fn apply_preset(&mut self, preset: &DimensionPreset) {
        self.dimensions = preset.dimensions();
    }
}

/// Configuration of the upload-only widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum uploaded file size
    pub max_size: SizeLimit,
    /// Accepted input media types
    pub accepted_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size: SizeLimit::UPLOAD_DEFAULT,
            accepted_types: upload_accepted_types(),
        }
    }
}

/// Named output size offered by the configuration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionPreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl DimensionPreset {
    pub fn dimensions(&self) -> OutputDimensions {
        // Preset table only holds positive sizes
        OutputDimensions::new(self.width, self.height).unwrap_or_default()
    }

    /// Look up a preset by its display name.
    pub fn find(name: &str) -> Option<&'static DimensionPreset> {
        DIMENSION_PRESETS.iter().find(|p| p.name == name)
    }
}

/// Presets shown in the dimension picker.
pub const DIMENSION_PRESETS: &[DimensionPreset] = &[
    DimensionPreset {
        name: "Square (50×50)",
        width: 50,
        height: 50,
    },
    DimensionPreset {
        name: "Rectangle (50×75)",
        width: 50,
        height: 75,
    },
    DimensionPreset {
        name: "Profile (200×200)",
        width: 200,
        height: 200,
    },
    DimensionPreset {
        name: "Banner (1200×400)",
        width: 1200,
        height: 400,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_config_defaults() {
        let config = CropConfig::new();
        assert_eq!(config.shape, CropShape::Square);
        assert_eq!(config.dimensions, OutputDimensions::default());
        assert_eq!(config.corner_radius, 0.0);
        assert_eq!(config.size_limit.bytes(), 2 * 1024 * 1024);
        assert_eq!(config.accepted_types, vec!["image/jpeg", "image/png"]);
    }

    #[test]
    fn test_upload_config_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.max_size.bytes(), 5 * 1024 * 1024);
        assert_eq!(config.accepted_types.len(), 4);
        assert!(config.accepted_types.iter().any(|t| t == "image/webp"));
    }

    #[test]
    fn test_corner_radius_clamped() {
        let mut config = CropConfig::new();
        config.dimensions = OutputDimensions::new(300, 150).unwrap();
        config.corner_radius = 500.0;
        assert_eq!(config.effective_corner_radius(), 75.0);

        config.corner_radius = -4.0;
        assert_eq!(config.effective_corner_radius(), 0.0);

        config.corner_radius = f64::NAN;
        assert_eq!(config.effective_corner_radius(), 0.0);
    }

    #[test]
    fn test_corner_radius_ignored_for_circle() {
        let mut config = CropConfig::new();
        config.corner_radius = 20.0;
        config.shape = CropShape::Circle;
        assert_eq!(config.effective_corner_radius(), 0.0);
    }

    #[test]
    fn test_set_shape_circle_resets_radius() {
        let mut config = CropConfig::new();
        config.corner_radius = 12.0;
        config.set_shape(CropShape::Rectangle);
        assert_eq!(config.corner_radius, 12.0);
        config.set_shape(CropShape::Circle);
        assert_eq!(config.corner_radius, 0.0);
    }

    #[test]
    fn test_apply_preset() {
        let mut config = CropConfig::new();
        let banner = DimensionPreset::find("Banner (1200×400)").unwrap();
        config.apply_preset(banner);
        assert_eq!(config.dimensions.width(), 1200);
        assert_eq!(config.dimensions.height(), 400);
        assert!(DimensionPreset::find("Poster").is_none());
    }
}
