//! Cropkit WASM - WebAssembly bindings for Cropkit
//!
//! This crate exposes the cropkit-core crop session to JavaScript/TypeScript
//! front ends. The page owns the file picker and the canvas; this crate owns
//! the crop geometry, the masked output and the session rules.
//!
//! # Module Structure
//!
//! - `session` - The `CropSession` class (upload, edit, commit, reset)
//! - `config` - Parsing of the camelCase options object
//! - `types` - The `JsCroppedImage` result wrapper
//! - `validate` - File validation and byte formatting helpers
//! - `logger` - `log` backend writing to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession, validateImageFile } from '@cropkit/wasm';
//!
//! await init();
//!
//! const check = validateImageFile(file.size, file.type);
//! if (!check.valid) throw new Error(check.message);
//!
//! const session = new CropSession({ shape: 'square', cornerRadius: 12 });
//! session.loadImage(new Uint8Array(await file.arrayBuffer()), file.type);
//! const cropped = session.commitCrop();
//! preview.src = cropped.dataUri();
//! ```

use wasm_bindgen::prelude::*;

mod config;
mod logger;
mod session;
mod types;
mod validate;

pub use config::{JsCropConfig, JsDimensions};
pub use session::{JsCommitJob, JsCommitOutcome, JsCropSession};
pub use types::JsCroppedImage;
pub use validate::{dimension_presets, format_bytes, validate_image_file};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Raise or lower console verbosity: `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`.
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    log::set_max_level(filter);
    Ok(())
}

fn parse_level(level: &str) -> Option<log::LevelFilter> {
    level.parse().ok()
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(parse_level("WARN"), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }
}
