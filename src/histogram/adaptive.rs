//! Local-statistics enhancement of dark, low-contrast regions.
//!
//! For every pixel the mean `m_s` and variance `σ_s²` of its window are
//! compared with the global mean `m` and variance `σ²` of the luminance.
//! A pixel is enhanced when
//!
//! ```text
//! k0·m ≤ m_s ≤ k1·m   and   k2·σ² ≤ σ_s² ≤ k3·σ²
//! ```
//!
//! and its luminance becomes `clip(round(C · Y), 0, 255)`. Color images work
//! on Y of YCbCr and keep the chroma; every pixel whose Y is not changed is
//! copied unchanged.
//!
//! Window sums come from a summed-area table over a reflect-padded plane, so
//! the cost is independent of the window size.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::{ImageLabError, Result};
use crate::filters::convolve::Boundary;
use crate::grid::{plane, quantize_sample, rgb_to_ycbcr, validate_image, ycbcr_to_rgb, Plane};

/// Window boundary for the local statistics.
pub const BOUNDARY: Boundary = Boundary::Reflect;

/// Parameters of adaptive equalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveEqualization {
    /// Odd window size.
    pub window: usize,
    /// Lower mean gate, as a fraction of the global mean.
    pub k0: f64,
    /// Upper mean gate.
    pub k1: f64,
    /// Lower variance gate, as a fraction of the global variance.
    pub k2: f64,
    /// Upper variance gate.
    pub k3: f64,
    /// Gain `C` applied to eligible pixels.
    pub gain: f64,
}

impl Default for AdaptiveEqualization {
    fn default() -> Self {
        AdaptiveEqualization {
            window: 3,
            k0: 0.0,
            k1: 0.25,
            k2: 0.0,
            k3: 0.1,
            gain: 50.0,
        }
    }
}

impl AdaptiveEqualization {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 || self.window % 2 == 0 {
            return Err(ImageLabError::invalid_parameter(format!(
                "window must be odd and positive, got {}",
                self.window
            )));
        }
        let named = [
            ("k0", self.k0),
            ("k1", self.k1),
            ("k2", self.k2),
            ("k3", self.k3),
            ("gain", self.gain),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ImageLabError::invalid_parameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    fn accepts(&self, global: Stats, local: Stats) -> bool {
        local.mean >= self.k0 * global.mean
            && local.mean <= self.k1 * global.mean
            && local.variance >= self.k2 * global.variance
            && local.variance <= self.k3 * global.variance
    }
}

#[derive(Clone, Copy, Debug)]
struct Stats {
    mean: f64,
    variance: f64,
}

fn global_stats(plane: &Plane) -> Stats {
    let n = plane.len() as f64;
    let mean = plane.sum() / n;
    let variance = plane.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Stats { mean, variance }
}

/// Summed-area table over the plane padded by `pad` on every side.
///
/// Entry `(y, x)` holds the sum of padded samples above and left of it, with
/// a zero first row and column.
fn integral_image(samples: ArrayView2<f64>, pad: usize, square: bool) -> Array2<f64> {
    let (height, width) = samples.dim();
    let (ph, pw) = (height + 2 * pad, width + 2 * pad);
    let mut table = Array2::<f64>::zeros((ph + 1, pw + 1));

    for y in 0..ph {
        let sy = BOUNDARY
            .resolve(y as isize - pad as isize, height)
            .unwrap_or(0);
        let mut row_sum = 0.0;
        for x in 0..pw {
            let sx = BOUNDARY
                .resolve(x as isize - pad as isize, width)
                .unwrap_or(0);
            let v = samples[[sy, sx]];
            row_sum += if square { v * v } else { v };
            table[[y + 1, x + 1]] = table[[y, x + 1]] + row_sum;
        }
    }
    table
}

#[inline]
fn box_sum(table: &Array2<f64>, y: usize, x: usize, window: usize) -> f64 {
    table[[y + window, x + window]] - table[[y, x + window]] - table[[y + window, x]]
        + table[[y, x]]
}

/// Enhanced luminance per pixel, `None` where the gate rejects it.
fn enhanced_levels(luma: &Plane, params: &AdaptiveEqualization) -> Option<Array2<Option<u8>>> {
    let global = global_stats(luma);
    if global.variance == 0.0 {
        log::debug!("adaptive_equalize: constant luminance, nothing to enhance");
        return None;
    }

    let window = params.window;
    let pad = window / 2;
    let sums = integral_image(luma.view(), pad, false);
    let squares = integral_image(luma.view(), pad, true);
    let area = (window * window) as f64;

    let levels = Array2::from_shape_fn(luma.dim(), |(y, x)| {
        let mean = box_sum(&sums, y, x, window) / area;
        // Rounding can push a flat window slightly below zero
        let variance = (box_sum(&squares, y, x, window) / area - mean * mean).max(0.0);
        params
            .accepts(global, Stats { mean, variance })
            .then(|| quantize_sample(params.gain * luma[[y, x]]))
    });
    Some(levels)
}

/// Apply adaptive equalization.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `params` - Window size, gates and gain
///
/// # Returns
/// Enhanced image with the same shape; alpha is preserved
pub fn adaptive_equalize(
    input: ArrayView3<u8>,
    params: &AdaptiveEqualization,
) -> Result<Array3<u8>> {
    validate_image(input)?;
    params.validate()?;
    let (height, width, channels) = input.dim();
    let mut output = input.to_owned();

    let luma = if channels == 1 {
        plane(input, 0)
    } else {
        Plane::from_shape_fn((height, width), |(y, x)| {
            let rgb = [0, 1, 2].map(|c| input[[y, x, c]] as f64);
            quantize_sample(rgb_to_ycbcr(rgb)[0]) as f64
        })
    };

    let Some(levels) = enhanced_levels(&luma, params) else {
        return Ok(output);
    };

    let mut enhanced = 0usize;
    for ((y, x), level) in levels.indexed_iter() {
        let Some(new_y) = *level else { continue };
        if new_y as f64 == luma[[y, x]] {
            continue;
        }
        enhanced += 1;
        if channels == 1 {
            output[[y, x, 0]] = new_y;
        } else {
            let rgb = [0, 1, 2].map(|c| input[[y, x, c]] as f64);
            let [_, cb, cr] = rgb_to_ycbcr(rgb);
            let [r, g, b] = ycbcr_to_rgb([new_y as f64, cb, cr]);
            output[[y, x, 0]] = quantize_sample(r);
            output[[y, x, 1]] = quantize_sample(g);
            output[[y, x, 2]] = quantize_sample(b);
        }
    }

    log::debug!(
        "adaptive_equalize: window={} enhanced {} of {} pixels",
        params.window,
        enhanced,
        height * width
    );
    Ok(output)
}
