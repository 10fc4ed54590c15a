//! WebAssembly exports for imagelab operations.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Every function
//! takes a flat RGBA byte buffer (length = width * height * 4, as produced by
//! `ImageData.data`) and returns a flat RGBA buffer of the same size.
//! Invalid dimensions or parameters are thrown as JS errors.

use ndarray::{Array3, ArrayView3};
use wasm_bindgen::prelude::*;

use crate::error::ImageLabError;
use crate::filters::edge::{detect_edges, EdgeOperator};
use crate::filters::laplacian::{sharpen, LaplacianKernel};
use crate::filters::noise::{add_salt_and_pepper, median_filter};
use crate::filters::point::{apply_point_transform, PointTransform};
use crate::histogram::{adaptive_equalize, equalize, AdaptiveEqualization};

fn rgba_view(data: &[u8], width: usize, height: usize) -> Result<ArrayView3<'_, u8>, JsError> {
    ArrayView3::from_shape((height, width, 4), data).map_err(|_| {
        JsError::from(ImageLabError::InvalidShape(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            width * height * 4,
            width,
            height,
            data.len()
        )))
    })
}

fn into_flat(result: Array3<u8>) -> Vec<u8> {
    result.into_raw_vec_and_offset().0
}

// ============================================================================
// Spatial filters
// ============================================================================

/// Edge map with "sobel", "prewitt", "roberts" or "kirsch".
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `operator` - Edge operator name
/// * `threshold` - Binarization threshold, negative for a grayscale magnitude map
#[wasm_bindgen]
pub fn edges_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    operator: &str,
    threshold: f64,
) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    let op: EdgeOperator = operator.parse()?;
    let threshold = (threshold >= 0.0).then_some(threshold);
    Ok(into_flat(detect_edges(input, op, threshold)?))
}

/// Laplacian sharpening with "4n_neg", "8n_neg", "4n_pos" or "8n_pos".
#[wasm_bindgen]
pub fn sharpen_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kernel: &str,
) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    let kind: LaplacianKernel = kernel.parse()?;
    Ok(into_flat(sharpen(input, kind)?))
}

/// Salt-and-pepper noise, deterministic for a given seed.
#[wasm_bindgen]
pub fn salt_and_pepper_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    salt: f64,
    pepper: f64,
    seed: u64,
) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    Ok(into_flat(add_salt_and_pepper(input, salt, pepper, seed)?))
}

/// Median filter with an odd window.
#[wasm_bindgen]
pub fn median_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    size: usize,
) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    Ok(into_flat(median_filter(input, size)?))
}

// ============================================================================
// Tonal operations
// ============================================================================

/// Global histogram equalization.
#[wasm_bindgen]
pub fn equalize_rgba_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    Ok(into_flat(equalize(input)?))
}

/// Adaptive equalization with default gates and the given window and gain.
#[wasm_bindgen]
pub fn adaptive_equalize_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    window: usize,
    gain: f64,
) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    let params = AdaptiveEqualization {
        window,
        gain,
        ..Default::default()
    };
    Ok(into_flat(adaptive_equalize(input, &params)?))
}

/// Gamma correction `c · r^γ`.
#[wasm_bindgen]
pub fn gamma_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    c: f64,
    gamma: f64,
) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    let transform = PointTransform::Gamma { c, gamma };
    Ok(into_flat(apply_point_transform(input, &transform)?))
}

/// Color inversion, alpha preserved.
#[wasm_bindgen]
pub fn invert_rgba_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let input = rgba_view(data, width, height)?;
    let result = apply_point_transform(input, &PointTransform::Invert)?;
    Ok(into_flat(result))
}
