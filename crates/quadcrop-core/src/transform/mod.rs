//! Perspective correction of a user-selected quadrangle.
//!
//! This module turns four corners picked over a photo into an upright,
//! rectangular crop.
//!
//! # Pipeline
//!
//! 1. Normalize the corners (convex, clockwise, top-left first)
//! 2. Scale them into raw pixel space
//! 3. Derive the output size from the edge lengths (or a fixed aspect)
//! 4. Solve the homography and resample
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y increases downward
//! - Corners are continuous coordinates; `(width, height)` is the far edge

mod homography;
mod perspective;
mod sampling;

pub use homography::Homography;
pub use perspective::{
    perspective_correct, perspective_correct_corners, CropOptions, QuadCorners, TransformError,
    MAX_OUTPUT_PIXELS,
};
