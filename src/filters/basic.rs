//! Basic image processing operations.
//!
//! Simple pixel-wise operations that don't require spatial context:
//! - Grayscale conversion (BT.601 luma)
//! - Binary threshold
//! - Red channel extraction
//! - Alpha channel extraction

use ndarray::{s, Array2, Array3, ArrayView3, Axis};

use crate::error::Result;
use crate::grid::{from_channel, luminance, quantize, validate_image};

/// Convert to a single-channel luminance image.
///
/// Grayscale input is returned as a copy; alpha is dropped.
pub fn to_grayscale(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    validate_image(input)?;
    Ok(from_channel(quantize(&luminance(input))))
}

/// Apply binary threshold to the luminance.
///
/// # Returns
/// Single-channel image where pixels >= threshold become 255, others become 0
pub fn binary_threshold(input: ArrayView3<u8>, threshold: u8) -> Result<Array3<u8>> {
    let gray = to_grayscale(input)?;
    Ok(gray.mapv(|v| if v >= threshold { 255 } else { 0 }))
}

/// Keep the red channel and zero green and blue.
///
/// Grayscale input is treated as R = G = B, so the result is an RGB image
/// whose red channel is the gray level. Alpha is preserved.
pub fn red_channel(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    validate_image(input)?;
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels.max(3)));

    output
        .index_axis_mut(Axis(2), 0)
        .assign(&input.index_axis(Axis(2), 0));
    if channels == 4 {
        output
            .slice_mut(s![.., .., 3])
            .assign(&input.slice(s![.., .., 3]));
    }
    Ok(output)
}

/// Alpha channel of an RGBA image, `None` for images without alpha.
pub fn alpha_channel(input: ArrayView3<u8>) -> Option<Array2<u8>> {
    let (_, _, channels) = input.dim();
    (channels == 4).then(|| input.index_axis(Axis(2), 3).to_owned())
}
