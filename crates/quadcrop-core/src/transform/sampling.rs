//! Pixel sampling at fractional source coordinates.
//!
//! Coordinates are in pixel-index space: `(0.0, 0.0)` is the center of the
//! top-left pixel. Samples further than half a pixel outside the image are
//! black; samples inside that margin are clamped to the nearest edge pixel.

use crate::pixels::{InterpolationFilter, PixelImage};

/// Sample the image at (x, y) with the given filter.
#[inline]
pub(crate) fn sample(image: &PixelImage, x: f64, y: f64, filter: InterpolationFilter) -> [u8; 3] {
    if !in_bounds(image, x, y) {
        return [0, 0, 0];
    }
    match filter {
        InterpolationFilter::Nearest => sample_nearest(image, x, y),
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
        InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
    }
}

#[inline]
fn in_bounds(image: &PixelImage, x: f64, y: f64) -> bool {
    let max_x = image.width as f64 - 0.5;
    let max_y = image.height as f64 - 0.5;
    x >= -0.5 && x <= max_x && y >= -0.5 && y <= max_y
}

/// Get a pixel as [f64; 3], clamping coordinates to the image.
#[inline]
fn get_pixel_f64(image: &PixelImage, px: i64, py: i64) -> [f64; 3] {
    let px = px.clamp(0, image.width as i64 - 1) as u32;
    let py = py.clamp(0, image.height as i64 - 1) as u32;
    let [r, g, b] = image.pixel(px, py);
    [r as f64, g as f64, b as f64]
}

fn sample_nearest(image: &PixelImage, x: f64, y: f64) -> [u8; 3] {
    let [r, g, b] = get_pixel_f64(image, x.round() as i64, y.round() as i64);
    [r as u8, g as u8, b as u8]
}

/// Bilinear interpolation over the 4 nearest pixels.
fn sample_bilinear(image: &PixelImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    result
}

/// Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Falls back to bilinear within the kernel radius of the border.
fn sample_lanczos3(image: &PixelImage, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (image.width as i64, image.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let pixel = get_pixel_f64(image, px, py);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    let mut result = [0u8; 3];
    if weight_sum > 0.0 {
        for i in 0..3 {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    result
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
