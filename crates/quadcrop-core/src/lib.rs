//! Quadcrop Core - Perspective cropping library
//!
//! This crate provides the core functionality for Quadcrop: turning four
//! corners dragged over a photo into an upright, perspective-corrected crop.
//!
//! # Module Structure
//!
//! - `geometry` - Points, rects and the quadrangle normalizer
//! - `coords` - Overlay / view / image coordinate mapping (aspect-fit aware)
//! - `pixels` - RGB pixel buffers and interpolation filters
//! - `transform` - Homography solving and perspective correction
//!
//! # Logging
//!
//! Diagnostics are emitted through `tracing`. The library never installs a
//! subscriber; the host application decides where events go.

pub mod coords;
pub mod geometry;
pub mod pixels;
pub mod transform;

pub use coords::{
    aspect_fit_rect, coordinates_on_image, coordinates_on_image_view, image_to_view,
    view_to_image, CoordError, CropOverlay, DisplayedImage, ImageView,
};
pub use geometry::{
    is_convex, normalize_quadrangle, signed_area, OrderedQuadrangle, Point, QuadError, Rect, Size,
};
pub use pixels::{InterpolationFilter, PixelImage};
pub use transform::{
    perspective_correct, CropOptions, QuadCorners, TransformError, MAX_OUTPUT_PIXELS,
};
