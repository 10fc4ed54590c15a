//! Contrast stretching with linear and three-segment piecewise level maps.
//!
//! Both variants work on one color channel at a time through a 256-entry
//! [`LevelMap`]. A degenerate input range (`r_max <= r_min`) is reported with
//! a warning and the image is returned unchanged.

use ndarray::{Array3, ArrayView3};

use crate::error::{ImageLabError, Result};
use crate::grid::{map_color_planes, quantize_sample, validate_image};
use crate::histogram::LevelMap;

/// `[r_min, r_max] → [0, 255]`; levels outside the range saturate.
///
/// `None` when the input range is empty.
pub fn linear_stretch_map(r_min: u8, r_max: u8) -> Option<LevelMap> {
    if r_max <= r_min {
        return None;
    }
    let span = (r_max - r_min) as f64;
    Some(LevelMap::from_fn(|v| {
        if v < r_min {
            0
        } else if v > r_max {
            255
        } else {
            quantize_sample((v - r_min) as f64 * 255.0 / span)
        }
    }))
}

/// Three segments through `(0, 0)`, `(r_min, l0)`, `(r_max, l1)`, `(255, 255)`.
///
/// With `r_min = 0` the first segment has zero width and level 0 maps to 0.
pub fn piecewise_stretch_map(r_min: u8, r_max: u8, l0: u8, l1: u8) -> Result<Option<LevelMap>> {
    if l0 > l1 {
        return Err(ImageLabError::invalid_parameter(format!(
            "output levels must satisfy l0 <= l1, got {} > {}",
            l0, l1
        )));
    }
    if r_max <= r_min {
        return Ok(None);
    }

    let (r_min, r_max, l0, l1) = (r_min as f64, r_max as f64, l0 as f64, l1 as f64);
    let segment = |v: f64, x0: f64, x1: f64, y0: f64, y1: f64| {
        if x1 == x0 {
            y0
        } else {
            (v - x0) / (x1 - x0) * (y1 - y0) + y0
        }
    };

    Ok(Some(LevelMap::from_fn(|level| {
        let v = level as f64;
        let s = if v <= r_min {
            segment(v, 0.0, r_min, 0.0, l0)
        } else if v <= r_max {
            segment(v, r_min, r_max, l0, l1)
        } else {
            segment(v, r_max, 255.0, l1, 255.0)
        };
        quantize_sample(s)
    })))
}

fn apply_or_copy(
    input: ArrayView3<u8>,
    map: Option<LevelMap>,
    r_min: u8,
    r_max: u8,
) -> Result<Array3<u8>> {
    validate_image(input)?;
    match map {
        Some(map) => map_color_planes(input, |channel| Ok(map.apply(channel))),
        None => {
            log::warn!(
                "contrast stretch: empty input range [{}, {}], image left unchanged",
                r_min,
                r_max
            );
            Ok(input.to_owned())
        }
    }
}

/// Linear contrast stretch.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `r_min` - Input level mapped to 0
/// * `r_max` - Input level mapped to 255
pub fn stretch_linear(input: ArrayView3<u8>, r_min: u8, r_max: u8) -> Result<Array3<u8>> {
    apply_or_copy(input, linear_stretch_map(r_min, r_max), r_min, r_max)
}

/// Piecewise linear contrast stretch.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `r_min`, `r_max` - Input breakpoints
/// * `l0`, `l1` - Output levels at the breakpoints (`l0 <= l1`)
pub fn stretch_piecewise(
    input: ArrayView3<u8>,
    r_min: u8,
    r_max: u8,
    l0: u8,
    l1: u8,
) -> Result<Array3<u8>> {
    let map = piecewise_stretch_map(r_min, r_max, l0, l1)?;
    apply_or_copy(input, map, r_min, r_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> Array3<u8> {
        Array3::from_shape_fn((1, 256, 1), |(_, x, _)| x as u8)
    }

    #[test]
    fn test_linear_endpoints_and_saturation() {
        let result = stretch_linear(levels().view(), 50, 150).unwrap();
        assert_eq!(result[[0, 10, 0]], 0);
        assert_eq!(result[[0, 50, 0]], 0);
        assert_eq!(result[[0, 100, 0]], 128);
        assert_eq!(result[[0, 150, 0]], 255);
        assert_eq!(result[[0, 200, 0]], 255);
    }

    #[test]
    fn test_linear_full_range_is_identity() {
        let img = levels();
        assert_eq!(stretch_linear(img.view(), 0, 255).unwrap(), img);
    }

    #[test]
    fn test_degenerate_range_returns_copy() {
        let img = levels();
        assert_eq!(stretch_linear(img.view(), 100, 100).unwrap(), img);
        assert_eq!(
            stretch_piecewise(img.view(), 200, 10, 50, 200).unwrap(),
            img
        );
    }

    #[test]
    fn test_piecewise_breakpoints() {
        let map = piecewise_stretch_map(100, 150, 50, 200).unwrap().unwrap();
        assert_eq!(map.get(0), 0);
        assert_eq!(map.get(100), 50);
        assert_eq!(map.get(125), 125);
        assert_eq!(map.get(150), 200);
        assert_eq!(map.get(255), 255);
        assert!(map.is_monotonic());
    }

    #[test]
    fn test_piecewise_zero_width_segment() {
        let map = piecewise_stretch_map(0, 100, 40, 200).unwrap().unwrap();
        assert_eq!(map.get(0), 0);
        assert_eq!(map.get(1), 42);
        let top = piecewise_stretch_map(10, 255, 20, 230).unwrap().unwrap();
        assert_eq!(top.get(255), 230);
    }

    #[test]
    fn test_piecewise_rejects_crossed_outputs() {
        assert!(matches!(
            stretch_piecewise(levels().view(), 10, 20, 200, 100),
            Err(ImageLabError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_alpha_preserved() {
        let img = Array3::<u8>::from_elem((2, 2, 4), 60);
        let result = stretch_linear(img.view(), 50, 70).unwrap();
        assert_eq!(result[[1, 1, 0]], 128);
        assert_eq!(result[[1, 1, 3]], 60);
    }
}
