//! WASM bindings for coordinate mapping between the crop overlay, the image
//! view and the image's pixels.
//!
//! Views are described by plain objects:
//!
//! ```typescript
//! const view = {
//!   bounds: { origin: { x: 0, y: 0 }, size: { width: 375, height: 500 } },
//!   globalOrigin: { x: 0, y: 88 },
//!   image: { size: { width: 1512, height: 2016 }, scale: 1 },
//! };
//! const overlay = { corners: handles, globalOrigin: { x: 0, y: 88 } };
//! ```

use quadcrop_core::coords::{self, CropOverlay, ImageView};
use quadcrop_core::Point;
use wasm_bindgen::prelude::*;

use crate::{from_js, to_js_error};

/// Map overlay handle positions into the unscaled pixel space of the image.
///
/// # Errors
///
/// Throws if either view has no `globalOrigin`, the view has no `image`,
/// or a size is degenerate.
#[wasm_bindgen]
pub fn coordinates_on_image(view: JsValue, overlay: JsValue) -> Result<JsValue, JsValue> {
    let view: ImageView = from_js(view, "image view")?;
    let overlay: CropOverlay = from_js(overlay, "crop overlay")?;

    let points = coords::coordinates_on_image(&view, &overlay).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&points).map_err(to_js_error)
}

/// Map image pixel positions back into view-local points.
///
/// Useful for placing the initial crop handles on the image corners.
#[wasm_bindgen]
pub fn image_to_view(view: JsValue, points: JsValue) -> Result<JsValue, JsValue> {
    let view: ImageView = from_js(view, "image view")?;
    let points: Vec<Point> = from_js(points, "points")?;

    let on_view = coords::image_to_view(&view, &points).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&on_view).map_err(to_js_error)
}
