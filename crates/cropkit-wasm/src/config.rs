//! Cropper options as passed from JavaScript.
//!
//! ```typescript
//! const session = new CropSession({
//!   shape: 'rectangle',
//!   dimensions: { width: 300, height: 150 },
//!   cornerRadius: 20,
//!   sizeLimit: 2 * 1024 * 1024,
//! });
//! ```
//!
//! Every key is optional; missing keys fall back to the cropper defaults.

use cropkit_core::{CropConfig, CropShape, OutputDimensions, SizeLimit};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// `{ width, height }` in output pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JsDimensions {
    pub width: u32,
    pub height: u32,
}

/// JavaScript-facing configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsCropConfig {
    #[serde(default)]
    pub shape: Option<CropShape>,
    #[serde(default)]
    pub dimensions: Option<JsDimensions>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    /// Byte ceiling for both the upload and the cropped PNG
    #[serde(default)]
    pub size_limit: Option<u64>,
    #[serde(default)]
    pub accepted_types: Option<Vec<String>>,
}

impl JsCropConfig {
    /// Merge over `base`, keeping whatever the object leaves out.
    pub fn apply_to(&self, base: &CropConfig) -> Result<CropConfig, String> {
        let mut config = base.clone();

        if let Some(shape) = self.shape {
            config.set_shape(shape);
        }
        if let Some(dims) = self.dimensions {
            config.dimensions = OutputDimensions::new(dims.width, dims.height).ok_or_else(|| {
                format!(
                    "Invalid dimensions {}x{}: width and height must be positive",
                    dims.width, dims.height
                )
            })?;
        }
        if let Some(radius) = self.corner_radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(format!("Invalid corner radius: {}", radius));
            }
            config.corner_radius = radius;
        }
        if let Some(limit) = self.size_limit {
            config.size_limit = SizeLimit::new(limit)
                .ok_or_else(|| "Invalid size limit: must be positive".to_string())?;
        }
        if let Some(types) = &self.accepted_types {
            config.accepted_types = types.clone();
        }

        Ok(config)
    }

    pub fn from_config(config: &CropConfig) -> Self {
        Self {
            shape: Some(config.shape),
            dimensions: Some(JsDimensions {
                width: config.dimensions.width(),
                height: config.dimensions.height(),
            }),
            corner_radius: Some(config.corner_radius),
            size_limit: Some(config.size_limit.bytes()),
            accepted_types: Some(config.accepted_types.clone()),
        }
    }
}

/// Parse an optional JS options object over `base`. `undefined`/`null` keep `base`.
pub(crate) fn parse_config(value: JsValue, base: &CropConfig) -> Result<CropConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(base.clone());
    }
    let js: JsCropConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid cropper options: {}", e)))?;
    js.apply_to(base).map_err(|e| JsValue::from_str(&e))
}
