//! Coordinate mapping between the crop overlay, the image view and the
//! image's own pixels.
//!
//! The crop handles live in an overlay that sits on top of an image view.
//! The view shows the photo aspect-fit: scaled to fit and centered, which
//! leaves empty bands (letterboxing) on two sides. Getting from a handle
//! position to a pixel in the photo takes two steps:
//!
//! 1. overlay-local → view-local, via both views' global origins
//! 2. view-local → image pixels, undoing the aspect-fit offset and scale
//!
//! # Coordinate System
//!
//! - All spaces are y-down with the origin at their top-left corner
//! - "Global" is whatever shared frame both views report their origin in
//! - Image sizes are in display points; `scale` converts points to pixels
//!
//! # Example
//!
//! ```ignore
//! let view = ImageView {
//!     bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
//!     global_origin: Some(Point::new(0.0, 64.0)),
//!     image: Some(DisplayedImage { size: Size::new(200.0, 100.0), scale: 2.0 }),
//! };
//! let pixels = coordinates_on_image(&view, &overlay)?;
//! ```

use thiserror::Error;

use crate::geometry::{Point, Rect, Size};

/// Errors that can occur while mapping coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoordError {
    /// A view has no global origin (it is not attached to a hierarchy).
    #[error("View is not attached to a view hierarchy")]
    MissingSuperview,

    /// The image view is not showing an image.
    #[error("Image view has no image")]
    MissingImage,

    /// A size or scale is zero, negative or non-finite.
    #[error("Degenerate size: dimensions and scale must be finite and positive")]
    DegenerateSize,
}

/// The image shown inside an [`ImageView`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayedImage {
    /// Image size in display points.
    pub size: Size,
    /// Pixels per display point.
    pub scale: f64,
}

impl DisplayedImage {
    /// Size in raw pixels.
    pub fn pixel_size(&self) -> Size {
        Size::new(self.size.width * self.scale, self.size.height * self.scale)
    }
}

/// A view that displays an image with aspect-fit scaling.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    /// The view's own drawing area.
    pub bounds: Rect,
    /// Global position of the view's local origin.
    pub global_origin: Option<Point>,
    pub image: Option<DisplayedImage>,
}

/// The crop overlay holding the draggable corner handles.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropOverlay {
    /// Handle positions, local to the overlay.
    pub corners: Vec<Point>,
    /// Global position of the overlay's local origin.
    pub global_origin: Option<Point>,
}

/// Largest rect with the aspect ratio of `aspect` that fits in `bounds`,
/// centered on both axes.
///
/// # Errors
///
/// Returns [`CoordError::DegenerateSize`] if `aspect` has a zero or
/// non-finite dimension.
pub fn aspect_fit_rect(aspect: Size, bounds: Rect) -> Result<Rect, CoordError> {
    if !aspect.is_valid() {
        return Err(CoordError::DegenerateSize);
    }

    let scale = (bounds.size.width / aspect.width).min(bounds.size.height / aspect.height);
    let width = aspect.width * scale;
    let height = aspect.height * scale;

    Ok(Rect::new(
        bounds.origin.x + (bounds.size.width - width) / 2.0,
        bounds.origin.y + (bounds.size.height - height) / 2.0,
        width,
        height,
    ))
}

/// Map overlay handle positions into the image view's local coordinates.
///
/// Both origins are in the same global space, so a handle at `c` in the
/// overlay lands at `c + overlay_origin - view_origin` in the view. An
/// overlay placed 10pt right of the view shifts its handles 10pt right.
///
/// # Errors
///
/// Returns [`CoordError::MissingSuperview`] if either view has no global origin.
pub fn coordinates_on_image_view(
    view: &ImageView,
    overlay: &CropOverlay,
) -> Result<Vec<Point>, CoordError> {
    let view_origin = view.global_origin.ok_or(CoordError::MissingSuperview)?;
    let overlay_origin = overlay.global_origin.ok_or(CoordError::MissingSuperview)?;
    let offset = overlay_origin - view_origin;

    Ok(overlay.corners.iter().map(|&c| c + offset).collect())
}

/// Map overlay handle positions into the unscaled pixel space of the image.
///
/// The result is ready to be fed to
/// [`normalize_quadrangle`](crate::geometry::normalize_quadrangle) or
/// [`perspective_correct`](crate::transform::perspective_correct).
///
/// # Errors
///
/// - [`CoordError::MissingSuperview`] if either view has no global origin
/// - [`CoordError::MissingImage`] if the view shows no image
/// - [`CoordError::DegenerateSize`] if the image or view has no area
pub fn coordinates_on_image(
    view: &ImageView,
    overlay: &CropOverlay,
) -> Result<Vec<Point>, CoordError> {
    let on_view = coordinates_on_image_view(view, overlay)?;
    view_to_image(view, &on_view)
}

/// Map view-local points into image pixels.
pub fn view_to_image(view: &ImageView, points: &[Point]) -> Result<Vec<Point>, CoordError> {
    let (frame, factor) = fitted_frame(view)?;
    Ok(points.iter().map(|&p| (p - frame.origin) * factor).collect())
}

/// Map image pixels into view-local points, e.g. to place the initial handles.
pub fn image_to_view(view: &ImageView, points: &[Point]) -> Result<Vec<Point>, CoordError> {
    let (frame, factor) = fitted_frame(view)?;
    Ok(points
        .iter()
        .map(|&p| p * (1.0 / factor) + frame.origin)
        .collect())
}

/// Where the image is drawn inside the view, in view-local points.
pub fn displayed_image_frame(view: &ImageView) -> Result<Rect, CoordError> {
    fitted_frame(view).map(|(frame, _)| frame)
}

/// The aspect-fit frame and the pixels-per-view-point factor.
fn fitted_frame(view: &ImageView) -> Result<(Rect, f64), CoordError> {
    let image = view.image.as_ref().ok_or(CoordError::MissingImage)?;
    if !image.scale.is_finite() || image.scale <= 0.0 {
        return Err(CoordError::DegenerateSize);
    }

    let frame = aspect_fit_rect(image.size, view.bounds)?;
    if !frame.size.is_valid() {
        return Err(CoordError::DegenerateSize);
    }

    let factor = image.size.height * image.scale / frame.size.height;
    Ok((frame, factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landscape_view() -> ImageView {
        // 200x100pt image at 2x, shown in a 100x100 view
        ImageView {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            global_origin: Some(Point::new(0.0, 64.0)),
            image: Some(DisplayedImage {
                size: Size::new(200.0, 100.0),
                scale: 2.0,
            }),
        }
    }

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_aspect_fit_letterbox() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);

        let wide = aspect_fit_rect(Size::new(200.0, 100.0), bounds).unwrap();
        assert_eq!(wide, Rect::new(0.0, 25.0, 100.0, 50.0));

        let tall = aspect_fit_rect(Size::new(100.0, 200.0), bounds).unwrap();
        assert_eq!(tall, Rect::new(25.0, 0.0, 50.0, 100.0));
    }

    #[test]
    fn test_aspect_fit_exact_and_offset() {
        let bounds = Rect::new(10.0, 20.0, 300.0, 150.0);
        let fit = aspect_fit_rect(Size::new(4.0, 2.0), bounds).unwrap();
        assert_eq!(fit, bounds);
    }

    #[test]
    fn test_aspect_fit_rejects_degenerate() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(
            aspect_fit_rect(Size::new(0.0, 10.0), bounds),
            Err(CoordError::DegenerateSize)
        );
        assert_eq!(
            aspect_fit_rect(Size::new(10.0, f64::NAN), bounds),
            Err(CoordError::DegenerateSize)
        );
    }

    #[test]
    fn test_overlay_to_view() {
        let view = landscape_view();
        let overlay = CropOverlay {
            corners: vec![Point::new(1.0, 1.0), Point::new(50.0, 30.0)],
            global_origin: Some(Point::new(10.0, 84.0)),
        };
        let on_view = coordinates_on_image_view(&view, &overlay).unwrap();
        assert_eq!(on_view, vec![Point::new(11.0, 21.0), Point::new(60.0, 50.0)]);
    }

    #[test]
    fn test_missing_superview() {
        let mut view = landscape_view();
        let overlay = CropOverlay {
            corners: vec![Point::ZERO],
            global_origin: None,
        };
        assert_eq!(
            coordinates_on_image_view(&view, &overlay),
            Err(CoordError::MissingSuperview)
        );

        view.global_origin = None;
        let overlay = CropOverlay {
            corners: vec![Point::ZERO],
            global_origin: Some(Point::ZERO),
        };
        assert_eq!(
            coordinates_on_image(&view, &overlay),
            Err(CoordError::MissingSuperview)
        );
    }

    #[test]
    fn test_frame_corners_map_to_pixel_corners() {
        let view = landscape_view();
        let frame_corners = [Point::new(0.0, 25.0), Point::new(100.0, 75.0)];
        let pixels = view_to_image(&view, &frame_corners).unwrap();

        assert_close(pixels[0], Point::new(0.0, 0.0));
        assert_close(pixels[1], Point::new(400.0, 200.0));
    }

    #[test]
    fn test_overlay_to_image() {
        let view = landscape_view();
        // Overlay shares the view's origin
        let overlay = CropOverlay {
            corners: vec![
                Point::new(0.0, 25.0),
                Point::new(100.0, 25.0),
                Point::new(100.0, 75.0),
                Point::new(0.0, 75.0),
            ],
            global_origin: view.global_origin,
        };
        let pixels = coordinates_on_image(&view, &overlay).unwrap();

        assert_close(pixels[2], Point::new(400.0, 200.0));
        assert_close(pixels[3], Point::new(0.0, 200.0));
    }

    #[test]
    fn test_letterbox_points_map_outside_image() {
        let view = landscape_view();
        let pixels = view_to_image(&view, &[Point::new(50.0, 0.0)]).unwrap();
        assert!(pixels[0].y < 0.0);
    }

    #[test]
    fn test_missing_image() {
        let mut view = landscape_view();
        view.image = None;
        assert_eq!(
            view_to_image(&view, &[Point::ZERO]),
            Err(CoordError::MissingImage)
        );
    }

    #[test]
    fn test_degenerate_view_or_scale() {
        let mut view = landscape_view();
        view.bounds = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            view_to_image(&view, &[Point::ZERO]),
            Err(CoordError::DegenerateSize)
        );

        let mut view = landscape_view();
        if let Some(image) = view.image.as_mut() {
            image.scale = 0.0;
        }
        assert_eq!(
            image_to_view(&view, &[Point::ZERO]),
            Err(CoordError::DegenerateSize)
        );
    }

    #[test]
    fn test_image_to_view_round_trip() {
        let view = landscape_view();
        let original = [Point::new(12.5, 40.0), Point::new(77.0, 61.0)];
        let pixels = view_to_image(&view, &original).unwrap();
        let back = image_to_view(&view, &pixels).unwrap();

        for (a, b) in original.iter().zip(back.iter()) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_displayed_image_frame() {
        let view = landscape_view();
        assert_eq!(
            displayed_image_frame(&view).unwrap(),
            Rect::new(0.0, 25.0, 100.0, 50.0)
        );
        assert_eq!(
            view.image.unwrap().pixel_size(),
            Size::new(400.0, 200.0)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
