//! Noise filters: salt-and-pepper injection, mean and median filters.
//!
//! The window filters aggregate the k×k neighborhood directly instead of
//! going through the convolution engine (the median is not a weighted sum).
//! Out-of-range neighbors repeat the nearest edge pixel.
//!
//! ## Supported Formats
//!
//! All filters accept images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - processes the single channel
//! - **RGB**: (height, width, 3) - processes all 3 channels
//! - **RGBA**: (height, width, 4) - processes RGB, preserves alpha

use ndarray::{Array2, Array3, ArrayView3, Zip};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ImageLabError, Result};
use crate::grid::{color_channels, map_color_planes, validate_image};

// ============================================================================
// Salt and Pepper
// ============================================================================

/// Corrupt an image with salt (255) and pepper (0) pixels.
///
/// `round(ratio · H · W)` positions are drawn uniformly with replacement for
/// each kind, so collisions can make the final count slightly lower. All
/// color channels of a chosen pixel are set; alpha is preserved.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `salt` - Fraction of pixels set to white, in [0, 1)
/// * `pepper` - Fraction of pixels set to black, in [0, 1)
/// * `seed` - Random seed for deterministic results
pub fn add_salt_and_pepper(
    input: ArrayView3<u8>,
    salt: f64,
    pepper: f64,
    seed: u64,
) -> Result<Array3<u8>> {
    validate_image(input)?;
    for (name, ratio) in [("salt", salt), ("pepper", pepper)] {
        if !(0.0..1.0).contains(&ratio) {
            return Err(ImageLabError::invalid_parameter(format!(
                "{} ratio must be in [0, 1), got {}",
                name, ratio
            )));
        }
    }

    let (height, width, channels) = input.dim();
    let mut output = input.to_owned();
    let mut rng = StdRng::seed_from_u64(seed);
    let pixels = (height * width) as f64;

    // Pepper after salt: a pixel drawn by both ends up black
    for (ratio, level) in [(salt, 255u8), (pepper, 0u8)] {
        let count = (ratio * pixels).round() as usize;
        for _ in 0..count {
            let y = rng.gen_range(0..height);
            let x = rng.gen_range(0..width);
            for c in 0..color_channels(channels) {
                output[[y, x, c]] = level;
            }
        }
    }

    log::debug!(
        "add_salt_and_pepper: {}x{} salt={} pepper={} seed={}",
        height,
        width,
        salt,
        pepper,
        seed
    );
    Ok(output)
}

// ============================================================================
// Window filters
// ============================================================================

fn check_window(size: usize) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(ImageLabError::invalid_parameter(format!(
            "window size must be odd and positive, got {}",
            size
        )));
    }
    Ok(())
}

/// Collect each k×k neighborhood (edge-replicated) and reduce it to a level.
fn window_filter<F>(input: ArrayView3<u8>, size: usize, reduce: F) -> Result<Array3<u8>>
where
    F: Fn(&mut [u8]) -> u8 + Sync,
{
    check_window(size)?;
    let radius = (size / 2) as isize;

    map_color_planes(input, |channel| {
        let (height, width) = channel.dim();
        let mut output = Array2::<u8>::zeros((height, width));

        Zip::indexed(&mut output).par_for_each(|(y, x), out| {
            let mut values: Vec<u8> = Vec::with_capacity(size * size);

            for dy in -radius..=radius {
                let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;

                for dx in -radius..=radius {
                    let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;

                    values.push(channel[[sy, sx]]);
                }
            }

            *out = reduce(&mut values);
        });

        Ok(output)
    })
}

/// Apply mean (box average) filter.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `size` - Odd window size k (k×k neighborhood)
///
/// # Returns
/// Filtered image, each sample rounded to the nearest level
pub fn mean_filter(input: ArrayView3<u8>, size: usize) -> Result<Array3<u8>> {
    window_filter(input, size, |values| {
        let sum: u32 = values.iter().map(|&v| v as u32).sum();
        (sum as f64 / values.len() as f64).round() as u8
    })
}

/// Apply median filter.
///
/// Removes salt-and-pepper noise while preserving edges.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `size` - Odd window size k (k×k neighborhood)
///
/// # Returns
/// Median-filtered image with same channel count
pub fn median_filter(input: ArrayView3<u8>, size: usize) -> Result<Array3<u8>> {
    window_filter(input, size, |values| {
        values.sort_unstable();
        values[values.len() / 2]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(height: usize, width: usize, value: u8) -> Array3<u8> {
        Array3::<u8>::from_elem((height, width, 1), value)
    }

    #[test]
    fn test_salt_and_pepper_deterministic() {
        let img = gray(16, 16, 128);
        let a = add_salt_and_pepper(img.view(), 0.05, 0.05, 12345).unwrap();
        let b = add_salt_and_pepper(img.view(), 0.05, 0.05, 12345).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_salt_and_pepper_counts() {
        let img = gray(40, 50, 128);
        let noisy = add_salt_and_pepper(img.view(), 0.1, 0.05, 7).unwrap();
        let salt = noisy.iter().filter(|&&v| v == 255).count();
        let pepper = noisy.iter().filter(|&&v| v == 0).count();
        // 200 and 100 draws, minus collisions
        assert!(salt <= 200 && salt > 150, "salt = {}", salt);
        assert!(pepper <= 100 && pepper > 80, "pepper = {}", pepper);
        let untouched = noisy.iter().filter(|&&v| v == 128).count();
        assert_eq!(salt + pepper + untouched, 2000);
    }

    #[test]
    fn test_salt_and_pepper_rejects_bad_ratio() {
        let img = gray(4, 4, 0);
        assert!(add_salt_and_pepper(img.view(), 1.0, 0.0, 0).is_err());
        assert!(add_salt_and_pepper(img.view(), 0.1, -0.1, 0).is_err());
        assert!(add_salt_and_pepper(img.view(), f64::NAN, 0.0, 0).is_err());
    }

    #[test]
    fn test_salt_and_pepper_color_pixel_and_alpha() {
        let mut img = Array3::<u8>::from_elem((8, 8, 4), 100);
        for y in 0..8 {
            for x in 0..8 {
                img[[y, x, 3]] = 42;
            }
        }
        let noisy = add_salt_and_pepper(img.view(), 0.2, 0.0, 3).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                let rgb = [noisy[[y, x, 0]], noisy[[y, x, 1]], noisy[[y, x, 2]]];
                assert!(rgb == [100; 3] || rgb == [255; 3]);
                assert_eq!(noisy[[y, x, 3]], 42);
            }
        }
    }

    #[test]
    fn test_median_removes_salt() {
        let mut img = gray(5, 5, 128);
        img[[2, 2, 0]] = 255;
        let result = median_filter(img.view(), 3).unwrap();
        assert_eq!(result[[2, 2, 0]], 128);
    }

    #[test]
    fn test_mean_smears_salt() {
        let mut img = gray(5, 5, 128);
        img[[2, 2, 0]] = 255;
        let result = mean_filter(img.view(), 3).unwrap();
        // (8 * 128 + 255) / 9 = 142.1
        assert_eq!(result[[2, 2, 0]], 142);
        assert_eq!(result[[1, 1, 0]], 142);
        assert_eq!(result[[0, 4, 0]], 128);
    }

    #[test]
    fn test_median_preserves_edge() {
        let mut img = gray(5, 5, 0);
        for y in 0..5 {
            for x in 2..5 {
                img[[y, x, 0]] = 255;
            }
        }
        let result = median_filter(img.view(), 3).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_window_size_one_is_identity() {
        let mut img = gray(3, 4, 9);
        img[[1, 2, 0]] = 200;
        assert_eq!(mean_filter(img.view(), 1).unwrap(), img);
        assert_eq!(median_filter(img.view(), 1).unwrap(), img);
    }

    #[test]
    fn test_even_window_rejected() {
        let img = gray(5, 5, 0);
        assert!(matches!(
            median_filter(img.view(), 4),
            Err(ImageLabError::InvalidParameter(_))
        ));
        assert!(mean_filter(img.view(), 0).is_err());
    }
}
