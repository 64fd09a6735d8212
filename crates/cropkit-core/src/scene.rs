//! Interactive scene: the displayed image plus the crop overlay.
//!
//! The scene is the only place where interaction deltas (drags, wheel
//! zooms, handle resizes) turn into new [`CropRegion`] and [`Transform2D`]
//! values. Nothing here touches pixels.

use crate::config::CropConfig;
use crate::decode::ImageResource;
use crate::geometry::{
    default_region, fit_to_surface, map_to_source, CropRegion, GeometryError, SourceRect,
    SurfaceSize, Transform2D,
};

/// Editable on-screen state for one loaded image.
#[derive(Debug, Clone)]
pub struct Scene {
    surface: SurfaceSize,
    image: ImageResource,
    image_transform: Transform2D,
    region: CropRegion,
}

impl Scene {
    /// Place `image` on a default 400x400 surface with a fresh default region.
    pub fn new(image: ImageResource, config: &CropConfig) -> Self {
        Self::with_surface(image, config, SurfaceSize::default())
    }

    pub fn with_surface(image: ImageResource, config: &CropConfig, surface: SurfaceSize) -> Self {
        let image_transform = fit_to_surface(image.width(), image.height(), surface);
        let region = default_region(
            config.shape,
            config.dimensions,
            config.effective_corner_radius(),
            image.width(),
            image.height(),
            &image_transform,
        );
        log::debug!(
            "Scene for {}x{} image: scale {:.4}, region {:?}",
            image.width(),
            image.height(),
            image_transform.scale,
            region
        );
        Self {
            surface,
            image,
            image_transform,
            region,
        }
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn image(&self) -> &ImageResource {
        &self.image
    }

    pub fn image_transform(&self) -> Transform2D {
        self.image_transform
    }

    pub fn region(&self) -> CropRegion {
        self.region
    }

    /// Replace the region with a new default one for `config`.
    ///
    /// Called whenever the shape, output size or corner radius changes.
    pub fn rebuild_region(&mut self, config: &CropConfig) {
        self.region = default_region(
            config.shape,
            config.dimensions,
            config.effective_corner_radius(),
            self.image.width(),
            self.image.height(),
            &self.image_transform,
        );
    }

    pub fn drag_region(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.region = self.region.translated(dx, dy);
        }
    }

    /// Scale the region about its center. See [`CropRegion::scaled`].
    pub fn resize_region(&mut self, factor: f64) {
        self.region = self.region.scaled(factor);
    }

    /// Replace the region outright, e.g. after a handle drag on the overlay.
    ///
    /// # Errors
    ///
    /// `GeometryError::EmptyRegion` if the region is degenerate; the current
    /// region is kept.
    pub fn set_region(&mut self, region: CropRegion) -> Result<(), GeometryError> {
        if !region.is_valid() {
            return Err(GeometryError::EmptyRegion);
        }
        self.region = region;
        Ok(())
    }

    pub fn move_image(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.image_transform = self.image_transform.translated(dx, dy);
        }
    }

    /// Zoom the displayed image about its center. Non-positive or non-finite
    /// factors are ignored.
    pub fn zoom_image(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.image_transform = self.image_transform.scaled(factor);
        }
    }

    /// Source-pixel rectangle currently under the overlay.
    pub fn source_rect(&self) -> Result<SourceRect, GeometryError> {
        map_to_source(
            self.image.width(),
            self.image.height(),
            &self.image_transform,
            &self.region,
        )
    }
}
