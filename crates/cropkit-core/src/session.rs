//! Crop session state machine.
//!
//! ```text
//!            load_image                commit_crop
//!   Empty ─────────────▶ Editing ─────────────────▶ Cropped
//!     ▲                   ▲   ▲                       │
//!     │                   │   └──────── reset ────────┘
//!     └────── clear ──────┴── load_image (any phase) ─┘
//! ```
//!
//! Every operation either succeeds or leaves the session exactly as it was.
//!
//! ## Commits
//!
//! A commit is split in three steps so the heavy part can run away from the
//! interaction path:
//!
//! 1. [`CropSession::begin_commit`] maps the region and snapshots everything
//!    the render needs into a [`CommitJob`]. The session is now busy.
//! 2. [`CommitJob::run`] composes, masks, encodes and size-checks. It does not
//!    borrow the session.
//! 3. [`CropSession::finish_commit`] applies the outcome, unless the session
//!    moved on to another image in the meantime.
//!
//! [`CropSession::commit_crop`] does all three back to back.
//! [`CropSession::cancel_commit`] abandons a job that will never be finished.

use std::fmt;

use serde::Serialize;

use crate::artifact::CroppedArtifact;
use crate::compose::compose;
use crate::config::CropConfig;
use crate::decode::{decode_resource, ImageResource};
use crate::encode::encode_png;
use crate::error::CropError;
use crate::geometry::{CropRegion, GeometryError, SourceRect, SurfaceSize};
use crate::governor::{check_input, check_output, SizeLimit};
use crate::mask::ShapeMask;
use crate::scene::Scene;
use crate::{CropShape, OutputDimensions};

/// Externally visible phase of a [`CropSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No image loaded.
    Empty,
    /// Image loaded, region editable, no artifact.
    Editing,
    /// Artifact produced, region frozen.
    Cropped,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Empty => "empty",
            SessionPhase::Editing => "editing",
            SessionPhase::Cropped => "cropped",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a finished commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// The artifact was stored and the session is now `Cropped`.
    Applied,
    /// The session moved on to another image; the result was dropped.
    Discarded,
}

impl CommitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitStatus::Applied => "applied",
            CommitStatus::Discarded => "discarded",
        }
    }
}

/// Everything needed to render one crop, detached from the session.
#[derive(Debug, Clone)]
pub struct CommitJob {
    generation: u64,
    image: ImageResource,
    rect: SourceRect,
    shape: CropShape,
    dimensions: OutputDimensions,
    corner_radius: f64,
    size_limit: SizeLimit,
}

impl CommitJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Source rectangle that will be rendered.
    pub fn source_rect(&self) -> SourceRect {
        self.rect
    }

    /// Compose, mask, encode and size-check the crop.
    pub fn run(self) -> CommitOutcome {
        let result = self.render();
        CommitOutcome {
            generation: self.generation,
            result,
        }
    }

    fn render(&self) -> Result<CroppedArtifact, CropError> {
        let mask = ShapeMask::generate(self.shape, self.dimensions, self.corner_radius);
        let raster = compose(self.image.image(), &self.rect, self.dimensions, &mask)?;
        let png = encode_png(&raster.pixels, raster.width, raster.height)?;
        let artifact = CroppedArtifact::new(raster.width, raster.height, png);

        check_output(artifact.byte_size(), self.size_limit).map_err(CropError::from_output_check)?;
        Ok(artifact)
    }
}

/// Result of [`CommitJob::run`], tagged with the generation it was started in.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    generation: u64,
    result: Result<CroppedArtifact, CropError>,
}

impl CommitOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Result<CroppedArtifact, CropError> {
        &self.result
    }
}

enum State {
    Empty,
    Editing(Scene),
    Cropped {
        scene: Scene,
        artifact: CroppedArtifact,
    },
}

impl State {
    fn phase(&self) -> SessionPhase {
        match self {
            State::Empty => SessionPhase::Empty,
            State::Editing(_) => SessionPhase::Editing,
            State::Cropped { .. } => SessionPhase::Cropped,
        }
    }

    fn scene(&self) -> Option<&Scene> {
        match self {
            State::Empty => None,
            State::Editing(scene) | State::Cropped { scene, .. } => Some(scene),
        }
    }
}

type CompleteHandler = Box<dyn FnMut(&CroppedArtifact)>;

/// One upload-to-download lifecycle of the cropper.
pub struct CropSession {
    config: CropConfig,
    surface: SurfaceSize,
    state: State,
    /// Bumped whenever the loaded image changes or a commit is cancelled;
    /// outcomes from older generations are stale.
    generation: u64,
    /// Generation of the commit currently in flight.
    pending: Option<u64>,
    on_complete: Option<CompleteHandler>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(CropConfig::default())
    }
}

impl fmt::Debug for CropSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropSession")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl CropSession {
    pub fn new(config: CropConfig) -> Self {
        Self::with_surface(config, SurfaceSize::default())
    }

    /// Session drawing on a surface of the given display size.
    pub fn with_surface(config: CropConfig, surface: SurfaceSize) -> Self {
        Self {
            config,
            surface,
            state: State::Empty,
            generation: 0,
            pending: None,
            on_complete: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.state.scene()
    }

    pub fn image(&self) -> Option<&ImageResource> {
        self.scene().map(Scene::image)
    }

    pub fn region(&self) -> Option<CropRegion> {
        self.scene().map(Scene::region)
    }

    pub fn artifact(&self) -> Option<&CroppedArtifact> {
        match &self.state {
            State::Cropped { artifact, .. } => Some(artifact),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a commit has been started and not finished.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Register the handler invoked once per applied commit.
    pub fn set_on_complete<F>(&mut self, handler: F)
    where
        F: FnMut(&CroppedArtifact) + 'static,
    {
        self.on_complete = Some(Box::new(handler));
    }

    // ------------------------------------------------------------------
    // Image intake
    // ------------------------------------------------------------------

    /// Validate, decode and install an uploaded file.
    ///
    /// # Errors
    ///
    /// `CropError::Validation` for a rejected media type or an oversized
    /// file (checked before decoding), `CropError::Resource` if the bytes
    /// cannot be decoded. The session is unchanged on error.
    pub fn load_image(&mut self, bytes: &[u8], mime_type: &str) -> Result<(), CropError> {
        check_input(
            bytes.len() as u64,
            mime_type,
            &self.config.accepted_types,
            self.config.size_limit,
        )?;
        let resource = decode_resource(bytes, mime_type)?;
        self.install(resource);
        Ok(())
    }

    /// Install an already decoded image.
    ///
    /// # Errors
    ///
    /// `CropError::Validation` if the resource's declared type or byte size
    /// is not admitted.
    pub fn load_resource(&mut self, resource: ImageResource) -> Result<(), CropError> {
        check_input(
            resource.byte_size(),
            resource.mime_type(),
            &self.config.accepted_types,
            self.config.size_limit,
        )?;
        self.install(resource);
        Ok(())
    }

    fn install(&mut self, resource: ImageResource) {
        self.generation += 1;
        self.pending = None;
        log::info!(
            "Loaded {}x{} {} image ({} bytes), generation {}",
            resource.width(),
            resource.height(),
            resource.mime_type(),
            resource.byte_size(),
            self.generation
        );
        self.state = State::Editing(Scene::with_surface(resource, &self.config, self.surface));
    }

    /// Drop the image and any artifact.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.state = State::Empty;
        log::debug!("Session cleared, generation {}", self.generation);
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Replace the configuration and rebuild the crop region.
    ///
    /// A stored artifact is kept; it reflects the configuration it was
    /// committed with.
    pub fn set_config(&mut self, config: CropConfig) {
        self.config = config;
        self.rebuild_region();
    }

    pub fn set_shape(&mut self, shape: CropShape) {
        self.config.set_shape(shape);
        self.rebuild_region();
    }

    pub fn set_dimensions(&mut self, dimensions: OutputDimensions) {
        self.config.dimensions = dimensions;
        self.rebuild_region();
    }

    pub fn set_corner_radius(&mut self, radius: f64) {
        self.config.corner_radius = radius;
        self.rebuild_region();
    }

    /// Change the byte ceiling. The region is left alone.
    pub fn set_size_limit(&mut self, limit: SizeLimit) {
        self.config.size_limit = limit;
    }

    fn rebuild_region(&mut self) {
        match &mut self.state {
            State::Empty => {}
            State::Editing(scene) | State::Cropped { scene, .. } => scene.rebuild_region(&self.config),
        }
    }

    // ------------------------------------------------------------------
    // Region and image edits (Editing only)
    // ------------------------------------------------------------------

    pub fn drag_region(&mut self, dx: f64, dy: f64) -> Result<(), CropError> {
        self.editing_scene("move the crop region")?.drag_region(dx, dy);
        Ok(())
    }

    pub fn resize_region(&mut self, factor: f64) -> Result<(), CropError> {
        self.editing_scene("resize the crop region")?.resize_region(factor);
        Ok(())
    }

    pub fn set_region(&mut self, region: CropRegion) -> Result<(), CropError> {
        self.editing_scene("change the crop region")?.set_region(region)?;
        Ok(())
    }

    pub fn move_image(&mut self, dx: f64, dy: f64) -> Result<(), CropError> {
        self.editing_scene("move the image")?.move_image(dx, dy);
        Ok(())
    }

    pub fn zoom_image(&mut self, factor: f64) -> Result<(), CropError> {
        self.editing_scene("zoom the image")?.zoom_image(factor);
        Ok(())
    }

    fn editing_scene(&mut self, operation: &'static str) -> Result<&mut Scene, CropError> {
        let phase = self.state.phase();
        match &mut self.state {
            State::Editing(scene) => Ok(scene),
            _ => Err(CropError::InvalidState { operation, phase }),
        }
    }

    // ------------------------------------------------------------------
    // Commit
    // ------------------------------------------------------------------

    /// Snapshot the current crop into a job and mark the session busy.
    ///
    /// # Errors
    ///
    /// - `CropError::InProgress` if a commit is already pending
    /// - `CropError::Geometry` with no image loaded, or if the region cannot
    ///   be mapped to source pixels
    /// - `CropError::InvalidState` if the session already holds an artifact
    pub fn begin_commit(&mut self) -> Result<CommitJob, CropError> {
        if self.pending.is_some() {
            return Err(CropError::InProgress);
        }
        let scene = match &self.state {
            State::Editing(scene) => scene,
            State::Empty => return Err(GeometryError::NoCropRegion.into()),
            State::Cropped { .. } => {
                return Err(CropError::InvalidState {
                    operation: "crop",
                    phase: SessionPhase::Cropped,
                })
            }
        };

        let rect = scene.source_rect()?;
        let job = CommitJob {
            generation: self.generation,
            image: scene.image().clone(),
            rect,
            shape: self.config.shape,
            dimensions: self.config.dimensions,
            corner_radius: self.config.effective_corner_radius(),
            size_limit: self.config.size_limit,
        };

        self.pending = Some(self.generation);
        log::debug!(
            "Commit started for generation {}: source {:?} -> {}x{}",
            job.generation,
            rect,
            job.dimensions.width(),
            job.dimensions.height()
        );
        Ok(job)
    }

    /// Apply a finished job.
    ///
    /// # Errors
    ///
    /// The job's own error (`Resource`, `SizeExceeded`, ...) when it belongs
    /// to the current generation. The session stays in `Editing`.
    pub fn finish_commit(&mut self, outcome: CommitOutcome) -> Result<CommitStatus, CropError> {
        if self.pending == Some(outcome.generation) {
            self.pending = None;
        }

        if outcome.generation != self.generation {
            log::debug!(
                "Discarding commit from generation {} (current {})",
                outcome.generation,
                self.generation
            );
            return Ok(CommitStatus::Discarded);
        }

        let artifact = outcome.result?;

        let scene = match std::mem::replace(&mut self.state, State::Empty) {
            State::Editing(scene) => scene,
            other => {
                self.state = other;
                log::debug!("Discarding commit: session is {}", self.state.phase());
                return Ok(CommitStatus::Discarded);
            }
        };

        log::info!(
            "Crop committed: {}x{}, {} bytes",
            artifact.width(),
            artifact.height(),
            artifact.byte_size()
        );
        if let Some(handler) = self.on_complete.as_mut() {
            handler(&artifact);
        }
        self.state = State::Cropped { scene, artifact };
        Ok(CommitStatus::Applied)
    }

    /// Run a full commit synchronously.
    pub fn commit_crop(&mut self) -> Result<&CroppedArtifact, CropError> {
        let outcome = self.begin_commit()?.run();
        self.finish_commit(outcome)?;
        self.artifact()
            .ok_or_else(|| GeometryError::NoCropRegion.into())
    }

    /// Abandon the pending commit so the session accepts a new one.
    ///
    /// The abandoned job's outcome is discarded when it is finished. Returns
    /// `false` if nothing was pending.
    pub fn cancel_commit(&mut self) -> bool {
        let Some(generation) = self.pending.take() else {
            return false;
        };
        self.generation += 1;
        log::debug!(
            "Commit for generation {} cancelled, now {}",
            generation,
            self.generation
        );
        true
    }

    /// Leave `Cropped`, discarding the artifact and keeping the region.
    ///
    /// A no-op while editing.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidState` when no image is loaded.
    pub fn reset(&mut self) -> Result<(), CropError> {
        match std::mem::replace(&mut self.state, State::Empty) {
            State::Empty => Err(CropError::InvalidState {
                operation: "reset",
                phase: SessionPhase::Empty,
            }),
            State::Editing(scene) => {
                self.state = State::Editing(scene);
                Ok(())
            }
            State::Cropped { scene, .. } => {
                log::debug!("Crop discarded, back to editing");
                self.state = State::Editing(scene);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceError;
    use crate::geometry::Point;
    use crate::governor::ValidationError;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};
    use std::cell::Cell;
    use std::rc::Rc;

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let pixels: Vec<u8> = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&pixels, width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    fn rectangle_config() -> CropConfig {
        CropConfig {
            shape: CropShape::Rectangle,
            dimensions: OutputDimensions::new(300, 150).unwrap(),
            corner_radius: 20.0,
            ..CropConfig::default()
        }
    }

    fn editing_session(config: CropConfig) -> CropSession {
        let mut session = CropSession::new(config);
        session
            .load_image(&png_bytes(64, 48, [40, 80, 120, 255]), "image/png")
            .unwrap();
        session
    }

    fn decode_png(bytes: &[u8]) -> image::RgbaImage {
        image::load_from_memory(bytes).unwrap().into_rgba8()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = CropSession::default();
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.region().is_none());
        assert!(session.artifact().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_load_image_enters_editing() {
        let session = editing_session(rectangle_config());
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert_eq!(session.generation(), 1);

        let (w, h) = session.region().unwrap().size();
        assert!((w / h - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_input_rejected_and_stays_empty() {
        let mut session = CropSession::default();
        let bytes = vec![0u8; 3 * 1024 * 1024];
        let err = session.load_image(&bytes, "image/png").unwrap_err();

        assert!(matches!(
            err,
            CropError::Validation(ValidationError::ImageTooLarge { .. })
        ));
        assert_eq!(session.phase(), SessionPhase::Empty);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_non_image_rejected() {
        let mut session = CropSession::default();
        let err = session.load_image(b"hello", "text/plain").unwrap_err();
        assert_eq!(err.to_string(), "Only image files are supported.");
        assert_eq!(session.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_undecodable_image_keeps_previous_state() {
        let mut session = editing_session(CropConfig::default());
        let region = session.region();

        let err = session.load_image(&[1, 2, 3, 4], "image/png").unwrap_err();
        assert!(matches!(err, CropError::Resource(ResourceError::Decode(_))));
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert_eq!(session.region(), region);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_commit_example_rectangle() {
        let mut session = CropSession::new(rectangle_config());
        session
            .load_image(&png_bytes(1000, 800, [0, 128, 255, 255]), "image/png")
            .unwrap();

        let rect = session.scene().unwrap().source_rect().unwrap();
        assert!((rect.width - 640.0).abs() < 1e-6);
        assert!((rect.height - 320.0).abs() < 1e-6);

        let artifact = session.commit_crop().unwrap().clone();
        assert_eq!((artifact.width(), artifact.height()), (300, 150));
        assert_eq!(session.phase(), SessionPhase::Cropped);

        let png = decode_png(artifact.png());
        assert_eq!(png.dimensions(), (300, 150));
        for (x, y) in [(0, 0), (299, 0), (0, 149), (299, 149)] {
            assert_eq!(png.get_pixel(x, y).0[3], 0, "corner ({}, {})", x, y);
        }
        assert_eq!(png.get_pixel(150, 75).0, [0, 128, 255, 255]);
    }

    #[test]
    fn test_commit_circle_is_masked() {
        let mut config = CropConfig::default();
        config.set_shape(CropShape::Circle);
        let mut session = editing_session(config);

        let artifact = session.commit_crop().unwrap();
        let png = decode_png(artifact.png());
        assert_eq!(png.dimensions(), (200, 200));
        assert_eq!(png.get_pixel(0, 0).0[3], 0);
        assert_eq!(png.get_pixel(100, 100).0[3], 255);
    }

    #[test]
    fn test_oversized_output_stays_editing() {
        let mut session = editing_session(CropConfig::default());
        session.set_size_limit(SizeLimit::new(50).unwrap());

        let err = session.commit_crop().unwrap_err();
        assert!(matches!(err, CropError::SizeExceeded { limit: 50, .. }));
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert!(session.image().is_some());
        assert!(session.artifact().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_commit_without_image() {
        let mut session = CropSession::default();
        assert_eq!(
            session.commit_crop().unwrap_err(),
            CropError::Geometry(GeometryError::NoCropRegion)
        );
    }

    #[test]
    fn test_reset_discards_artifact() {
        let mut session = editing_session(CropConfig::default());
        session.drag_region(5.0, 5.0).unwrap();
        let region = session.region();
        session.commit_crop().unwrap();

        session.reset().unwrap();
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert!(session.artifact().is_none());
        assert_eq!(session.region(), region);
    }

    #[test]
    fn test_reset_rules() {
        let mut session = CropSession::default();
        assert!(matches!(
            session.reset(),
            Err(CropError::InvalidState {
                phase: SessionPhase::Empty,
                ..
            })
        ));

        let mut session = editing_session(CropConfig::default());
        session.reset().unwrap();
        assert_eq!(session.phase(), SessionPhase::Editing);
    }

    #[test]
    fn test_region_frozen_while_cropped() {
        let mut session = editing_session(CropConfig::default());
        session.commit_crop().unwrap();

        let err = session.drag_region(1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            CropError::InvalidState {
                operation: "move the crop region",
                phase: SessionPhase::Cropped,
            }
        );
        assert!(matches!(
            session.commit_crop(),
            Err(CropError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_second_commit_rejected_while_pending() {
        let mut session = editing_session(CropConfig::default());
        let job = session.begin_commit().unwrap();
        assert!(session.is_busy());
        assert_eq!(session.begin_commit().unwrap_err(), CropError::InProgress);

        let status = session.finish_commit(job.run()).unwrap();
        assert_eq!(status, CommitStatus::Applied);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_stale_commit_discarded_after_new_image() {
        let calls = Rc::new(Cell::new(0));
        let mut session = editing_session(CropConfig::default());
        let counter = Rc::clone(&calls);
        session.set_on_complete(move |_| counter.set(counter.get() + 1));

        let job = session.begin_commit().unwrap();
        session
            .load_image(&png_bytes(32, 32, [255, 0, 0, 255]), "image/png")
            .unwrap();
        assert!(!session.is_busy());

        let status = session.finish_commit(job.run()).unwrap();
        assert_eq!(status, CommitStatus::Discarded);
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert!(session.artifact().is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_stale_commit_does_not_release_newer_pending() {
        let mut session = editing_session(CropConfig::default());
        let old = session.begin_commit().unwrap();
        session.clear();
        session
            .load_image(&png_bytes(16, 16, [0, 0, 0, 255]), "image/png")
            .unwrap();
        let fresh = session.begin_commit().unwrap();

        assert_eq!(session.finish_commit(old.run()).unwrap(), CommitStatus::Discarded);
        assert!(session.is_busy());
        assert_eq!(session.finish_commit(fresh.run()).unwrap(), CommitStatus::Applied);
    }

    #[test]
    fn test_on_complete_called_once_per_commit() {
        let calls = Rc::new(Cell::new(0));
        let mut session = editing_session(CropConfig::default());
        let counter = Rc::clone(&calls);
        session.set_on_complete(move |artifact| {
            assert!(artifact.data_uri().starts_with("data:image/png;base64,"));
            counter.set(counter.get() + 1);
        });

        session.commit_crop().unwrap();
        session.reset().unwrap();
        session.commit_crop().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_config_change_rebuilds_region() {
        let mut session = editing_session(CropConfig::default());
        session.drag_region(20.0, 0.0).unwrap();

        session.set_shape(CropShape::Circle);
        let region = session.region().unwrap();
        assert!(matches!(region, CropRegion::Circle { .. }));
        assert_eq!(region.center(), Point::new(200.0, 200.0));
        assert_eq!(session.config().corner_radius, 0.0);

        session.set_shape(CropShape::Rectangle);
        session.set_dimensions(OutputDimensions::new(1200, 400).unwrap());
        let (w, h) = session.region().unwrap().size();
        assert!((w / h - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_change_while_cropped_keeps_artifact() {
        let mut session = editing_session(CropConfig::default());
        session.commit_crop().unwrap();

        session.set_corner_radius(12.0);
        assert_eq!(session.phase(), SessionPhase::Cropped);
        assert!(session.artifact().is_some());
        assert_eq!(session.region().unwrap().corner_radius(), 12.0);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut session = editing_session(CropConfig::default());
        session.commit_crop().unwrap();
        session.clear();

        assert_eq!(session.phase(), SessionPhase::Empty);
        assert!(session.image().is_none());
        assert!(session.artifact().is_none());
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_edits_require_image() {
        let mut session = CropSession::default();
        assert!(matches!(
            session.zoom_image(2.0),
            Err(CropError::InvalidState {
                phase: SessionPhase::Empty,
                ..
            })
        ));
    }

    #[test]
    fn test_set_region_degenerate_is_geometry_error() {
        let mut session = editing_session(CropConfig::default());
        let err = session
            .set_region(CropRegion::rect(Point::new(0.0, 0.0), 0.0, 0.0, 0.0))
            .unwrap_err();
        assert_eq!(err, CropError::Geometry(GeometryError::EmptyRegion));
    }

    #[test]
    fn test_load_resource_checks_type() {
        let mut session = CropSession::default();
        let image = crate::decode::DecodedImage::new(2, 2, vec![255; 16]);
        let resource = ImageResource::new(image, 100, "image/gif").unwrap();
        assert!(matches!(
            session.load_resource(resource),
            Err(CropError::Validation(ValidationError::UnsupportedType { .. }))
        ));
    }

    fn small_resource() -> ImageResource {
        let image = crate::decode::DecodedImage::new(4, 4, vec![255; 64]);
        ImageResource::new(image, 64, "image/png").unwrap()
    }

    #[test]
    fn test_oversized_output_surface_is_resource_error() {
        let config = CropConfig {
            dimensions: OutputDimensions::new(1_000_000, 1_000_000).unwrap(),
            ..CropConfig::default()
        };
        let mut session = CropSession::new(config);
        session.load_resource(small_resource()).unwrap();
        let region = session.region();

        let err = session.commit_crop().unwrap_err();
        assert_eq!(
            err,
            CropError::Resource(ResourceError::SurfaceUnavailable {
                width: 1_000_000,
                height: 1_000_000
            })
        );
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert!(session.artifact().is_none());
        assert!(!session.is_busy());
        assert_eq!(session.region(), region);
    }

    #[test]
    fn test_surface_failure_leaves_session_editable() {
        let config = CropConfig {
            dimensions: OutputDimensions::new(crate::MAX_SURFACE_SIDE + 1, 10).unwrap(),
            ..CropConfig::default()
        };
        let mut session = CropSession::new(config);
        session.load_resource(small_resource()).unwrap();
        let called = Rc::new(Cell::new(0));
        let counter = Rc::clone(&called);
        session.set_on_complete(move |_| counter.set(counter.get() + 1));

        assert!(matches!(
            session.commit_crop(),
            Err(CropError::Resource(ResourceError::SurfaceUnavailable { .. }))
        ));
        assert_eq!(called.get(), 0);

        session.set_dimensions(OutputDimensions::new(20, 10).unwrap());
        assert_eq!(session.commit_crop().unwrap().width(), 20);
        assert_eq!(called.get(), 1);
    }

    #[test]
    fn test_load_resource_rejects_mismatched_buffer() {
        let bad = crate::decode::DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![255; 8],
        };
        assert!(matches!(
            ImageResource::new(bad, 8, "image/png"),
            Err(crate::decode::DecodeError::BufferMismatch { expected: 400, actual: 8 })
        ));
    }

    #[test]
    fn test_cancel_commit_frees_session_and_drops_outcome() {
        let mut session = editing_session(CropConfig::default());
        assert!(!session.cancel_commit());

        let abandoned = session.begin_commit().unwrap();
        assert!(session.is_busy());
        assert!(session.cancel_commit());
        assert!(!session.is_busy());

        let job = session.begin_commit().unwrap();
        let status = session.finish_commit(abandoned.run()).unwrap();
        assert_eq!(status, CommitStatus::Discarded);
        assert!(session.is_busy());

        assert_eq!(session.finish_commit(job.run()).unwrap(), CommitStatus::Applied);
        assert_eq!(session.phase(), SessionPhase::Cropped);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_cropper_size_message() {
        let mut session = CropSession::default();
        let err = session.load_image(&vec![0u8; 3 * 1024 * 1024], "image/png").unwrap_err();
        assert_eq!(err.to_string(), "Image size exceeds the limit of 2048 KB");
        assert_eq!(CommitStatus::Discarded.as_str(), "discarded");
    }
}
