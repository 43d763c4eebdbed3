//! WASM bindings for the perspective-correcting crop.

use crate::types::JsPixelImage;
use crate::{from_js, to_js_error};
use quadcrop_core::transform::{perspective_correct, CropOptions};
use quadcrop_core::Point;
use wasm_bindgen::prelude::*;

/// Crop the quadrangle enclosed by four corners into an upright rectangle.
///
/// # Arguments
///
/// * `image` - Source image
/// * `points` - Array of 4 {x, y} corners in any order
/// * `options` - Optional `{ filter, pointScale, outputAspect }` object;
///   `filter` is `"nearest"`, `"bilinear"` (default) or `"lanczos3"`
///
/// # Errors
///
/// Throws if the corners are not a convex quadrangle, the image is empty,
/// or the options are invalid.
///
/// # Example (TypeScript)
///
/// ```typescript
/// // Preview (fast, bilinear)
/// const preview = perspective_crop(image, corners);
///
/// // Export at 2x display scale with a fixed A4 aspect
/// const exported = perspective_crop(image, corners, {
///   filter: 'lanczos3',
///   pointScale: 2,
///   outputAspect: 210 / 297,
/// });
/// ```
#[wasm_bindgen]
pub fn perspective_crop(
    image: &JsPixelImage,
    points: JsValue,
    options: JsValue,
) -> Result<JsPixelImage, JsValue> {
    let points: Vec<Point> = from_js(points, "points")?;
    let options: CropOptions = if options.is_undefined() || options.is_null() {
        CropOptions::default()
    } else {
        from_js(options, "crop options")?
    };

    let src = image.to_pixel_image();
    let result = perspective_correct(&src, &points, &options).map_err(to_js_error)?;
    Ok(JsPixelImage::from_pixel_image(result))
}
