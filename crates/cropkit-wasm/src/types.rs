//! WASM-compatible wrapper for the crop output.

use cropkit_core::artifact::CROPPED_FILE_NAME;
use cropkit_core::CroppedArtifact;
use js_sys::{Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

/// A committed crop, as handed to JavaScript.
///
/// The PNG bytes live in WASM memory; `png()` copies them out as a
/// `Uint8Array`.
#[wasm_bindgen]
pub struct JsCroppedImage {
    artifact: CroppedArtifact,
}

#[wasm_bindgen]
impl JsCroppedImage {
    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.artifact.width()
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.artifact.height()
    }

    /// Encoded PNG size in bytes
    #[wasm_bindgen(getter, js_name = byteSize)]
    pub fn byte_size(&self) -> f64 {
        self.artifact.byte_size() as f64
    }

    #[wasm_bindgen(getter, js_name = mimeType)]
    pub fn mime_type(&self) -> String {
        self.artifact.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        CROPPED_FILE_NAME.to_string()
    }

    /// Copy of the encoded PNG.
    pub fn png(&self) -> Vec<u8> {
        self.artifact.png().to_vec()
    }

    /// `data:image/png;base64,...` for an `<img src>` preview.
    #[wasm_bindgen(js_name = dataUri)]
    pub fn data_uri(&self) -> String {
        self.artifact.data_uri()
    }

    /// `{ name, mimeType, bytes }` ready for `new File([bytes], name, { type })`.
    pub fn file(&self) -> Result<Object, JsValue> {
        file_object(&self.artifact)
    }
}

impl JsCroppedImage {
    pub(crate) fn from_artifact(artifact: CroppedArtifact) -> Self {
        Self { artifact }
    }
}

/// Build the `{ name, mimeType, bytes }` object passed to JS callbacks.
pub(crate) fn file_object(artifact: &CroppedArtifact) -> Result<Object, JsValue> {
    let file = artifact.file();
    let object = Object::new();
    Reflect::set(&object, &JsValue::from_str("name"), &JsValue::from_str(&file.name))?;
    Reflect::set(
        &object,
        &JsValue::from_str("mimeType"),
        &JsValue::from_str(&file.mime_type),
    )?;
    Reflect::set(
        &object,
        &JsValue::from_str("bytes"),
        &Uint8Array::from(file.bytes.as_slice()),
    )?;
    Ok(object)
}
