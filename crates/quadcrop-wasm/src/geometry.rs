//! WASM bindings for the quadrangle normalizer.

use quadcrop_core::geometry::{self, Point};
use wasm_bindgen::prelude::*;

use crate::{from_js, to_js_error};

/// Check whether the points form a convex polygon.
///
/// # Arguments
/// * `points` - Array of {x: number, y: number} objects
///
/// # Returns
/// `false` for fewer than 3 points, concave or self-intersecting shapes.
#[wasm_bindgen]
pub fn is_convex(points: JsValue) -> Result<bool, JsValue> {
    let points: Vec<Point> = from_js(points, "points")?;
    Ok(geometry::is_convex(&points))
}

/// Order four corners clockwise, starting at the top-left corner.
///
/// # Arguments
/// * `points` - Array of exactly 4 {x: number, y: number} objects
///
/// # Errors
/// Throws if there are not exactly 4 points or they are not convex.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const [topLeft, topRight, bottomRight, bottomLeft] = normalize_quadrangle(handles);
/// ```
#[wasm_bindgen]
pub fn normalize_quadrangle(points: JsValue) -> Result<JsValue, JsValue> {
    let points: Vec<Point> = from_js(points, "points")?;
    let ordered = geometry::normalize_quadrangle(&points).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(ordered.corners()).map_err(to_js_error)
}
