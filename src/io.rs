//! Loading and saving images through the `image` crate.
//!
//! Decoded images keep their natural channel count: grayscale stays a single
//! channel, color becomes RGB, and anything with alpha becomes RGBA.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{Array3, ArrayView3};

use crate::error::{ImageLabError, Result};
use crate::grid::validate_image;

/// Decoded pixels plus whether the source carried an alpha channel.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub pixels: Array3<u8>,
    pub has_alpha: bool,
}

fn to_array(width: u32, height: u32, channels: usize, raw: Vec<u8>) -> Result<Array3<u8>> {
    Array3::from_shape_vec((height as usize, width as usize, channels), raw)
        .map_err(|e| ImageLabError::InvalidShape(e.to_string()))
}

/// Read an image file; the format is detected from its contents.
pub fn load_image(path: impl AsRef<Path>) -> Result<LoadedImage> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    let has_alpha = decoded.color().has_alpha();
    let (width, height) = (decoded.width(), decoded.height());

    let pixels = match decoded {
        DynamicImage::ImageLuma8(gray) => to_array(width, height, 1, gray.into_raw())?,
        other if has_alpha => to_array(width, height, 4, other.to_rgba8().into_raw())?,
        other if !other.color().has_color() => {
            to_array(width, height, 1, other.to_luma8().into_raw())?
        }
        other => to_array(width, height, 3, other.to_rgb8().into_raw())?,
    };

    log::debug!(
        "load_image: {} {}x{} channels={}",
        path.display(),
        width,
        height,
        pixels.dim().2
    );
    Ok(LoadedImage { pixels, has_alpha })
}

/// Write an image; the format follows the file extension.
pub fn save_image(path: impl AsRef<Path>, input: ArrayView3<u8>) -> Result<()> {
    validate_image(input)?;
    let (height, width, channels) = input.dim();
    let (w, h) = (width as u32, height as u32);
    let raw: Vec<u8> = input.iter().copied().collect();
    let mismatch = || {
        ImageLabError::InvalidShape(format!(
            "cannot encode {}x{}x{}",
            height, width, channels
        ))
    };

    let image = match channels {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
        _ => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, raw).ok_or_else(mismatch)?),
    };
    image.save(path.as_ref())?;
    Ok(())
}
