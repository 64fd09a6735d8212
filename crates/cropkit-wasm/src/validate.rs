//! Standalone helpers for the upload widget and the configuration form.

use cropkit_core::config::DIMENSION_PRESETS;
use cropkit_core::{
    format_bytes as core_format_bytes, validate_image_file as core_validate, SizeLimit, UploadConfig,
};
use wasm_bindgen::prelude::*;

/// Check a picked file before reading it.
///
/// Returns `{ valid: boolean, message?: string }`. `maxSizeMb` defaults to 5.
#[wasm_bindgen(js_name = validateImageFile)]
pub fn validate_image_file(
    byte_size: f64,
    mime_type: &str,
    max_size_mb: Option<f64>,
) -> Result<JsValue, JsValue> {
    let limit = upload_limit(max_size_mb)?;
    let result = core_validate(byte_size.max(0.0) as u64, mime_type, limit);
    serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `1536` -> `"1.5 KB"`.
#[wasm_bindgen(js_name = formatBytes)]
pub fn format_bytes(bytes: f64) -> String {
    core_format_bytes(bytes.max(0.0) as u64)
}

/// `[{ name, width, height }, ...]` for the dimension picker.
#[wasm_bindgen(js_name = dimensionPresets)]
pub fn dimension_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&DIMENSION_PRESETS).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn upload_limit(max_size_mb: Option<f64>) -> Result<SizeLimit, String> {
    match max_size_mb {
        None => Ok(UploadConfig::default().max_size),
        Some(mb) => SizeLimit::from_megabytes(mb)
            .ok_or_else(|| format!("Invalid size limit: {} MB", mb)),
    }
}
