//! Quadcrop WASM - WebAssembly bindings for Quadcrop
//!
//! This crate provides WASM bindings to expose the quadcrop-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `geometry` - Convexity check and corner normalization
//! - `coords` - Overlay / view / image coordinate mapping
//! - `transform` - Perspective-correcting crop
//!
//! Points cross the boundary as arrays of `{x, y}` objects.
//!
//! # Usage
//!
//! ```typescript
//! import init, { normalize_quadrangle, perspective_crop, JsPixelImage } from '@quadcrop/wasm';
//!
//! await init();
//!
//! const corners = normalize_quadrangle(handles); // [{x, y}, ...] top-left first
//! const image = new JsPixelImage(width, height, rgbBytes);
//! const cropped = perspective_crop(image, corners, { filter: 'lanczos3' });
//! ```

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

mod coords;
mod geometry;
mod transform;
mod types;

// Re-export public types
pub use coords::{coordinates_on_image, image_to_view};
pub use geometry::{is_convex, normalize_quadrangle};
pub use transform::perspective_crop;
pub use types::JsPixelImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Deserialize a JS value, naming what was expected on failure.
pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| to_js_error(format!("Invalid {}: {}", what, e)))
}

/// Convert an error into a JS `Error`, reporting it on the console.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    let message = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}
