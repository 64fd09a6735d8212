//! Crop session bindings.
//!
//! # Example
//!
//! ```typescript
//! import { CropSession } from '@cropkit/wasm';
//!
//! const session = new CropSession({ shape: 'circle', dimensions: { width: 200, height: 200 } });
//! session.setOnCropComplete((dataUri, file) => {
//!   preview.src = dataUri;
//!   upload(new File([file.bytes], file.name, { type: file.mimeType }));
//! });
//!
//! session.loadImage(new Uint8Array(await file.arrayBuffer()), file.type);
//! session.dragRegion(12, -4);
//! session.commitCrop();
//! ```
//!
//! The render can also be split off the input handler:
//!
//! ```typescript
//! const job = session.beginCommit();
//! setTimeout(() => {
//!   const status = session.finishCommit(job.run()); // 'applied' or 'discarded'
//! });
//! // session.cancelCommit() if the job will never be finished
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use cropkit_core::{
    CommitJob, CommitOutcome, CropConfig, CropError, CropSession, CropShape, OutputDimensions,
    SizeLimit,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::config::{parse_config, JsCropConfig};
use crate::types::{file_object, JsCroppedImage};

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

type HandlerSlot = Rc<RefCell<Option<Function>>>;

/// One cropper instance: upload, edit the region, commit, reset.
#[wasm_bindgen(js_name = CropSession)]
pub struct JsCropSession {
    inner: CropSession,
    on_complete: HandlerSlot,
}

#[wasm_bindgen(js_class = CropSession)]
impl JsCropSession {
    /// Create a session. `options` may be omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsCropSession, JsValue> {
        let config = parse_config(options, &CropConfig::default())?;
        Ok(Self::with_config(config))
    }

    /// Register `(dataUri, { name, mimeType, bytes }) => void`, called once
    /// per successful commit.
    #[wasm_bindgen(js_name = setOnCropComplete)]
    pub fn set_on_crop_complete(&mut self, handler: Function) {
        *self.on_complete.borrow_mut() = Some(handler);
    }

    /// Validate, decode and show an uploaded file.
    #[wasm_bindgen(js_name = loadImage)]
    pub fn load_image(&mut self, bytes: &[u8], mime_type: &str) -> Result<(), JsValue> {
        self.inner.load_image(bytes, mime_type).map_err(to_js_error)
    }

    /// Merge new options over the current ones and rebuild the region.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, options: JsValue) -> Result<(), JsValue> {
        let config = parse_config(options, self.inner.config())?;
        self.inner.set_config(config);
        Ok(())
    }

    /// Current options as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&JsCropConfig::from_config(self.inner.config()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setShape)]
    pub fn set_shape(&mut self, shape: &str) -> Result<(), JsValue> {
        let shape: CropShape = shape.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.inner.set_shape(shape);
        Ok(())
    }

    #[wasm_bindgen(js_name = setDimensions)]
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        let dims = OutputDimensions::new(width, height).ok_or_else(|| {
            JsValue::from_str(&format!("Invalid dimensions {}x{}", width, height))
        })?;
        self.inner.set_dimensions(dims);
        Ok(())
    }

    #[wasm_bindgen(js_name = setCornerRadius)]
    pub fn set_corner_radius(&mut self, radius: f64) {
        self.inner.set_corner_radius(radius);
    }

    #[wasm_bindgen(js_name = setSizeLimit)]
    pub fn set_size_limit(&mut self, bytes: f64) -> Result<(), JsValue> {
        let limit = size_limit_from_f64(bytes)
            .ok_or_else(|| JsValue::from_str("Invalid size limit: must be a positive byte count"))?;
        self.inner.set_size_limit(limit);
        Ok(())
    }

    /// Apply a dimension preset by its display name, e.g. `"Profile (200×200)"`.
    #[wasm_bindgen(js_name = applyPreset)]
    pub fn apply_preset(&mut self, name: &str) -> Result<(), JsValue> {
        let preset = cropkit_core::DimensionPreset::find(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown preset: {}", name)))?;
        let mut config = self.inner.config().clone();
        config.apply_preset(preset);
        self.inner.set_config(config);
        Ok(())
    }

    #[wasm_bindgen(js_name = dragRegion)]
    pub fn drag_region(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.inner.drag_region(dx, dy).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = resizeRegion)]
    pub fn resize_region(&mut self, factor: f64) -> Result<(), JsValue> {
        self.inner.resize_region(factor).map_err(to_js_error)
    }

    /// Replace the region with a `{ kind: 'circle' | 'rect', ... }` object.
    #[wasm_bindgen(js_name = setRegion)]
    pub fn set_region(&mut self, region: JsValue) -> Result<(), JsValue> {
        let region = serde_wasm_bindgen::from_value(region)
            .map_err(|e| JsValue::from_str(&format!("Invalid crop region: {}", e)))?;
        self.inner.set_region(region).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = moveImage)]
    pub fn move_image(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.inner.move_image(dx, dy).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = zoomImage)]
    pub fn zoom_image(&mut self, factor: f64) -> Result<(), JsValue> {
        self.inner.zoom_image(factor).map_err(to_js_error)
    }

    /// Overlay in display coordinates, or `undefined` with no image.
    pub fn region(&self) -> Result<JsValue, JsValue> {
        match self.inner.region() {
            Some(region) => serde_wasm_bindgen::to_value(&region)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// `{ scale, offset: { x, y } }` of the displayed image, or `undefined`.
    #[wasm_bindgen(js_name = imageTransform)]
    pub fn image_transform(&self) -> Result<JsValue, JsValue> {
        match self.inner.scene() {
            Some(scene) => serde_wasm_bindgen::to_value(&scene.image_transform())
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// `"empty"`, `"editing"` or `"cropped"`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    #[wasm_bindgen(getter, js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Render the crop, store it, and notify the completion handler.
    #[wasm_bindgen(js_name = commitCrop)]
    pub fn commit_crop(&mut self) -> Result<JsCroppedImage, JsValue> {
        self.inner
            .commit_crop()
            .map(|artifact| JsCroppedImage::from_artifact(artifact.clone()))
            .map_err(to_js_error)
    }

    /// Snapshot the crop for a deferred render. The session is busy until
    /// `finishCommit` or `cancelCommit`.
    #[wasm_bindgen(js_name = beginCommit)]
    pub fn begin_commit(&mut self) -> Result<JsCommitJob, JsValue> {
        self.inner
            .begin_commit()
            .map(|job| JsCommitJob { job })
            .map_err(to_js_error)
    }

    /// Apply a rendered job. Returns `"applied"`, or `"discarded"` if the
    /// session moved on since `beginCommit`.
    #[wasm_bindgen(js_name = finishCommit)]
    pub fn finish_commit(&mut self, outcome: JsCommitOutcome) -> Result<String, JsValue> {
        self.inner
            .finish_commit(outcome.outcome)
            .map(|status| status.as_str().to_string())
            .map_err(to_js_error)
    }

    /// Abandon the pending job. Returns `false` if nothing was pending.
    #[wasm_bindgen(js_name = cancelCommit)]
    pub fn cancel_commit(&mut self) -> bool {
        self.inner.cancel_commit()
    }

    /// Last committed crop, if the session is in the cropped phase.
    pub fn artifact(&self) -> Option<JsCroppedImage> {
        self.inner
            .artifact()
            .map(|artifact| JsCroppedImage::from_artifact(artifact.clone()))
    }

    /// Discard the crop and go back to editing.
    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.inner.reset().map_err(to_js_error)
    }

    /// Drop the image and any crop.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl JsCropSession {
    pub(crate) fn with_config(config: CropConfig) -> Self {
        let on_complete: HandlerSlot = Rc::new(RefCell::new(None));
        let mut inner = CropSession::new(config);

        let slot = Rc::clone(&on_complete);
        inner.set_on_complete(move |artifact| {
            let Some(handler) = slot.borrow().clone() else {
                return;
            };
            let file = match file_object(artifact) {
                Ok(file) => file,
                Err(e) => {
                    log::error!("Could not build the cropped file object: {:?}", e);
                    return;
                }
            };
            if let Err(e) = handler.call2(
                &JsValue::NULL,
                &JsValue::from_str(&artifact.data_uri()),
                &file,
            ) {
                log::error!("Crop complete handler threw: {:?}", e);
            }
        });

        Self { inner, on_complete }
    }
}

/// A crop render detached from its session.
#[wasm_bindgen(js_name = CommitJob)]
pub struct JsCommitJob {
    job: CommitJob,
}

#[wasm_bindgen(js_class = CommitJob)]
impl JsCommitJob {
    /// Compose, mask and encode. Consumes the job.
    pub fn run(self) -> JsCommitOutcome {
        JsCommitOutcome {
            outcome: self.job.run(),
        }
    }
}

/// Result of `CommitJob.run`, to be passed to `CropSession.finishCommit`.
#[wasm_bindgen(js_name = CommitOutcome)]
pub struct JsCommitOutcome {
    outcome: CommitOutcome,
}

fn size_limit_from_f64(bytes: f64) -> Option<SizeLimit> {
    if !bytes.is_finite() || bytes < 1.0 || bytes > u64::MAX as f64 {
        return None;
    }
    SizeLimit::new(bytes as u64)
}
