//! Perspective-correcting crop.
//!
//! Maps the region enclosed by four corners of a photo (a receipt, a
//! whiteboard, a document shot at an angle) onto an upright rectangle.
//!
//! # Algorithm
//!
//! The warp uses inverse mapping: a homography is solved that takes the
//! output rectangle onto the source quadrangle, then every output pixel
//! center is projected into the source and sampled.
//!
//! ```text
//! (0, 0) ──────────── (w, 0)            top_left ───── top_right
//!   │                   │      H            /                \
//!   │      output       │   ──────►        /     source       \
//!   │                   │                 /                    \
//! (0, h) ──────────── (w, h)      bottom_left ─────────── bottom_right
//! ```
//!
//! # Coordinate System
//!
//! Corners use continuous image coordinates: `(0, 0)` is the outer top-left
//! edge of the image and `(width, height)` the outer bottom-right edge, so a
//! quad covering the full image reproduces the image unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::homography::Homography;
use super::sampling::sample;
use crate::geometry::{normalize_quadrangle, OrderedQuadrangle, Point, QuadError};
use crate::pixels::{InterpolationFilter, PixelImage};

/// Largest output accepted, in pixels (64 MP, ~200 MB of RGB).
///
/// Keeps the output buffer addressable on 32-bit targets such as wasm32.
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 26;

/// Errors that can occur during perspective correction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The corners could not be normalized.
    #[error(transparent)]
    Quad(#[from] QuadError),

    /// Source image has no pixels or an inconsistent buffer.
    #[error("Source image is empty")]
    EmptyImage,

    /// Point scale must be finite and positive.
    #[error("Invalid point scale: {0}")]
    InvalidScale(f64),

    /// Output aspect ratio must be finite and positive.
    #[error("Invalid output aspect ratio: {0}")]
    InvalidAspect(f64),

    /// The corners enclose more than [`MAX_OUTPUT_PIXELS`].
    #[error("Output of {width}x{height} pixels exceeds the size limit")]
    OutputTooLarge { width: u32, height: u32 },

    /// No projective mapping exists for the corners.
    #[error("Perspective transform failed: corners are degenerate")]
    TransformFailed,
}

/// Options for [`perspective_correct`].
///
/// Deserializes from a partial object; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropOptions {
    /// Resampling filter (Bilinear for preview, Lanczos3 for export).
    pub filter: InterpolationFilter,
    /// Multiplier taking the incoming corners into raw pixel space,
    /// e.g. the display scale factor when corners are in display points.
    pub point_scale: f64,
    /// Output width / height. `None` derives the size from the corners.
    pub output_aspect: Option<f64>,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            filter: InterpolationFilter::Bilinear,
            point_scale: 1.0,
            output_aspect: None,
        }
    }
}

impl CropOptions {
    fn validate(&self) -> Result<(), TransformError> {
        if !self.point_scale.is_finite() || self.point_scale <= 0.0 {
            return Err(TransformError::InvalidScale(self.point_scale));
        }
        match self.output_aspect {
            Some(aspect) if !aspect.is_finite() || aspect <= 0.0 => {
                Err(TransformError::InvalidAspect(aspect))
            }
            _ => Ok(()),
        }
    }
}

/// The four corner roles of a perspective correction request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl From<&OrderedQuadrangle> for QuadCorners {
    fn from(quad: &OrderedQuadrangle) -> Self {
        Self {
            top_left: quad.top_left(),
            top_right: quad.top_right(),
            bottom_right: quad.bottom_right(),
            bottom_left: quad.bottom_left(),
        }
    }
}

impl QuadCorners {
    /// Corners in clockwise order starting at the top-left.
    pub fn to_array(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Size of the corrected output.
    ///
    /// Width is the longer of the top and bottom edges, height the longer of
    /// the left and right edges. With `aspect` set, the height is derived from
    /// the width instead. Both dimensions are at least 1.
    pub fn output_dimensions(&self, aspect: Option<f64>) -> (u32, u32) {
        let width = self
            .top_left
            .distance(self.top_right)
            .max(self.bottom_left.distance(self.bottom_right));
        let height = match aspect {
            Some(aspect) => width / aspect,
            None => self
                .top_left
                .distance(self.bottom_left)
                .max(self.top_right.distance(self.bottom_right)),
        };

        (to_dimension(width), to_dimension(height))
    }
}

fn to_dimension(length: f64) -> u32 {
    if length.is_finite() {
        length.round().clamp(1.0, u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Normalize four raw corners and crop the enclosed region upright.
///
/// The corners may be given in any order; they are normalized first, then
/// multiplied by `options.point_scale` to reach raw pixel space.
///
/// # Errors
///
/// - [`TransformError::Quad`] if the corners are not a convex quadrangle
/// - [`TransformError::EmptyImage`] for an empty source
/// - [`TransformError::InvalidScale`] / [`TransformError::InvalidAspect`] for bad options
/// - [`TransformError::OutputTooLarge`] if the output would exceed [`MAX_OUTPUT_PIXELS`]
/// - [`TransformError::TransformFailed`] if no homography can be solved
pub fn perspective_correct(
    image: &PixelImage,
    quad: &[Point],
    options: &CropOptions,
) -> Result<PixelImage, TransformError> {
    options.validate()?;
    let ordered = normalize_quadrangle(quad)?;
    let corners = QuadCorners::from(&ordered.scaled(options.point_scale));
    warp(image, &corners, options)
}

/// Crop using corners whose roles are already known.
///
/// The corners are used as given, in raw pixel space; `options.point_scale`
/// is ignored.
pub fn perspective_correct_corners(
    image: &PixelImage,
    corners: &QuadCorners,
    options: &CropOptions,
) -> Result<PixelImage, TransformError> {
    options.validate()?;
    warp(image, corners, options)
}

fn warp(
    image: &PixelImage,
    corners: &QuadCorners,
    options: &CropOptions,
) -> Result<PixelImage, TransformError> {
    if image.is_empty() {
        return Err(TransformError::EmptyImage);
    }

    let (out_w, out_h) = corners.output_dimensions(options.output_aspect);
    let within_limit = u64::from(out_w)
        .checked_mul(u64::from(out_h))
        .is_some_and(|count| count <= MAX_OUTPUT_PIXELS);
    if !within_limit {
        tracing::warn!(out_w, out_h, "perspective crop output too large");
        return Err(TransformError::OutputTooLarge {
            width: out_w,
            height: out_h,
        });
    }
    let _span = tracing::debug_span!("perspective_correct", out_w, out_h).entered();

    let (w, h) = (out_w as f64, out_h as f64);
    let target = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ];
    let homography =
        Homography::from_pairs(&target, &corners.to_array()).ok_or(TransformError::TransformFailed)?;
    tracing::trace!(matrix = ?homography.h, "solved homography");

    let output = image::RgbImage::from_fn(out_w, out_h, |dst_x, dst_y| {
        // Pixel centers in, pixel indices out
        let center = Point::new(dst_x as f64 + 0.5, dst_y as f64 + 0.5);
        let src = homography.project(center);
        image::Rgb(sample(image, src.x - 0.5, src.y - 0.5, options.filter))
    });

    Ok(PixelImage::from_rgb_image(output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
