//! Crop geometry: surface placement, the editable crop region, and the
//! mapping from display coordinates back to source pixels.
//!
//! # Coordinate Systems
//!
//! - **Display space**: pixels of the interactive drawing surface. The image
//!   and the crop region are both placed here.
//! - **Source space**: intrinsic pixels of the uploaded image, origin at the
//!   top-left corner.
//!
//! A [`Transform2D`] is center-anchored: its offset is where the image's
//! center lands on the surface, and its scale maps one source pixel to
//! `scale` display pixels.

mod mapper;
mod region;
mod transform;

pub use mapper::{map_to_source, GeometryError, SourceRect};
pub use region::{default_region, CropRegion, MIN_REGION_EXTENT};
pub use transform::{fit_to_surface, Point, SurfaceSize, Transform2D, FIT_MARGIN};
