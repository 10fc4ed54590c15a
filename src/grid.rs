//! Image and plane helpers shared by all algorithms.
//!
//! ## Layout
//!
//! Images are `Array3<u8>` of shape (height, width, channels):
//! - **Grayscale**: (height, width, 1)
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4) - alpha is carried through untouched
//!
//! Intermediate computation happens on single-channel `f64` planes. A plane
//! becomes an image channel again only through [`quantize`], which rounds to
//! the nearest level and clamps to 0-255.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{ImageLabError, Result};

/// Single channel of floating point samples.
pub type Plane = Array2<f64>;

/// ITU-R BT.601 luma coefficients (the "L" conversion of common imaging tools).
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// Number of channels an algorithm should touch (alpha excluded).
#[inline]
pub fn color_channels(channels: usize) -> usize {
    if channels == 4 {
        3
    } else {
        channels
    }
}

/// Check that an image is non-empty with 1, 3 or 4 channels.
pub fn validate_image(input: ArrayView3<u8>) -> Result<()> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 {
        return Err(ImageLabError::InvalidShape(format!(
            "image must be at least 1x1, got {}x{}",
            height, width
        )));
    }
    if !matches!(channels, 1 | 3 | 4) {
        return Err(ImageLabError::InvalidShape(format!(
            "expected 1, 3 or 4 channels, got {}",
            channels
        )));
    }
    Ok(())
}

/// Check that a plane is at least 1x1.
pub fn validate_plane<T>(plane: ArrayView2<T>) -> Result<()> {
    let (height, width) = plane.dim();
    if height == 0 || width == 0 {
        return Err(ImageLabError::InvalidShape(format!(
            "plane must be at least 1x1, got {}x{}",
            height, width
        )));
    }
    Ok(())
}

/// Copy one channel of an image into a float plane.
pub fn plane(input: ArrayView3<u8>, channel: usize) -> Plane {
    input.index_axis(Axis(2), channel).mapv(f64::from)
}

/// Round to the nearest level and clamp into 0-255.
#[inline]
pub fn quantize_sample(v: f64) -> u8 {
    // NaN saturates to 0 through the cast
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert a float plane back into an image channel.
pub fn quantize(plane: &Plane) -> Array2<u8> {
    plane.mapv(quantize_sample)
}

/// Wrap a single channel as a (height, width, 1) image.
pub fn from_channel(channel: Array2<u8>) -> Array3<u8> {
    channel.insert_axis(Axis(2))
}

/// Apply `f` to every color channel independently; alpha is copied through.
pub fn map_color_planes<F>(input: ArrayView3<u8>, mut f: F) -> Result<Array3<u8>>
where
    F: FnMut(ArrayView2<u8>) -> Result<Array2<u8>>,
{
    validate_image(input)?;
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for c in 0..color_channels(channels) {
        let result = f(input.index_axis(Axis(2), c))?;
        output.index_axis_mut(Axis(2), c).assign(&result);
    }
    if channels == 4 {
        output
            .index_axis_mut(Axis(2), 3)
            .assign(&input.index_axis(Axis(2), 3));
    }
    Ok(output)
}

/// Luminance plane of an image. Grayscale images are returned as-is.
pub fn luminance(input: ArrayView3<u8>) -> Plane {
    let (height, width, channels) = input.dim();
    if channels < 3 {
        return plane(input, 0);
    }
    Array2::from_shape_fn((height, width), |(y, x)| {
        LUMA_R * input[[y, x, 0]] as f64
            + LUMA_G * input[[y, x, 1]] as f64
            + LUMA_B * input[[y, x, 2]] as f64
    })
}

/// Full-range (JPEG) RGB -> YCbCr.
#[inline]
pub fn rgb_to_ycbcr([r, g, b]: [f64; 3]) -> [f64; 3] {
    let y = LUMA_R * r + LUMA_G * g + LUMA_B * b;
    let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
    [y, cb, cr]
}

/// Full-range (JPEG) YCbCr -> RGB.
#[inline]
pub fn ycbcr_to_rgb([y, cb, cr]: [f64; 3]) -> [f64; 3] {
    let r = y + 1.402 * (cr - 128.0);
    let g = y - 0.344136 * (cb - 128.0) - 0.714136 * (cr - 128.0);
    let b = y + 1.772 * (cb - 128.0);
    [r, g, b]
}
