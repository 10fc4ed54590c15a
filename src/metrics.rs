//! Image quality metrics: brightness, contrast, entropy, sharpness.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{arr2, s, Array2, ArrayView2, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::convolve::Kernel;
use crate::filters::edge::{gradient_magnitude, EdgeOperator};
use crate::grid::{luminance, validate_image, validate_plane, Plane};

/// Bins used for the entropy of non-integer planes.
const ENTROPY_BINS: usize = 256;

/// Summary statistics of a plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Population mean.
    pub mean: f64,
    /// Population standard deviation.
    pub contrast: f64,
    /// Shannon entropy in bits.
    pub entropy: f64,
    /// Mean Sobel gradient magnitude.
    pub sharpness: f64,
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mean brightness: {:.4}", self.mean)?;
        writeln!(f, "contrast: {:.4}", self.contrast)?;
        writeln!(f, "entropy: {:.6}", self.entropy)?;
        write!(f, "sharpness: {:.6}", self.sharpness)
    }
}

fn entropy_of(probabilities: impl Iterator<Item = f64>) -> f64 {
    probabilities
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.log2())
        .sum::<f64>()
        // -0.0 for a single level
        .abs()
}

fn entropy(plane: ArrayView2<f64>) -> f64 {
    let n = plane.len() as f64;

    if plane.iter().all(|v| v.fract() == 0.0) {
        let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
        for &v in plane.iter() {
            *counts.entry(v as i64).or_default() += 1;
        }
        return entropy_of(counts.values().map(|&c| c as f64 / n));
    }

    let min = plane.fold(f64::INFINITY, |m, &v| m.min(v));
    let max = plane.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let width = max - min;
    if width <= 0.0 {
        return 0.0;
    }
    let mut counts = [0u64; ENTROPY_BINS];
    for &v in plane.iter() {
        // Closed last bin: max lands in bin 255
        let bin = (((v - min) / width) * ENTROPY_BINS as f64) as usize;
        counts[bin.min(ENTROPY_BINS - 1)] += 1;
    }
    entropy_of(counts.iter().map(|&c| c as f64 / n))
}

/// Mean Sobel magnitude over the whole plane.
///
/// Planes narrower than the 3x3 kernel read their replicate-resolved
/// neighborhood directly instead of going through `convolve`.
fn sharpness(plane: ArrayView2<f64>) -> Result<f64> {
    if plane.nrows() >= 3 && plane.ncols() >= 3 {
        let magnitude = gradient_magnitude(plane, EdgeOperator::Sobel)?;
        return Ok(magnitude.mean().unwrap_or(0.0));
    }

    let kernels = EdgeOperator::Sobel.kernels();
    let boundary = EdgeOperator::BOUNDARY;
    let (height, width) = plane.dim();
    let response = |kernel: &Kernel, y: usize, x: usize| {
        let mut sum = 0.0;
        for ((ky, kx), &weight) in kernel.weights().indexed_iter() {
            let sy = boundary.resolve(y as isize + ky as isize - 1, height);
            let sx = boundary.resolve(x as isize + kx as isize - 1, width);
            if let (Some(sy), Some(sx)) = (sy, sx) {
                sum += weight * plane[[sy, sx]];
            }
        }
        sum
    };

    let magnitude = Plane::from_shape_fn((height, width), |(y, x)| {
        let gx = response(&kernels[0], y, x);
        let gy = response(&kernels[1], y, x);
        (gx * gx + gy * gy).sqrt()
    });
    Ok(magnitude.mean().unwrap_or(0.0))
}

/// Compute brightness, contrast, entropy and sharpness of a plane.
pub fn compute_metrics(plane: ArrayView2<f64>) -> Result<MetricsReport> {
    validate_plane(plane)?;
    let n = plane.len() as f64;
    let mean = plane.sum() / n;
    let variance = plane.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

    Ok(MetricsReport {
        mean,
        contrast: variance.sqrt(),
        entropy: entropy(plane),
        sharpness: sharpness(plane)?,
    })
}

/// Metrics of an image's luminance.
pub fn image_metrics(input: ArrayView3<u8>) -> Result<MetricsReport> {
    validate_image(input)?;
    compute_metrics(luminance(input).view())
}

/// Fixed 10x10 test matrix with levels 0-7.
pub fn reference_matrix() -> Plane {
    arr2(&[
        [1., 1., 1., 1., 1., 1., 1., 1., 1., 1.],
        [1., 2., 2., 3., 1., 1., 1., 7., 2., 1.],
        [1., 2., 3., 2., 1., 1., 5., 3., 6., 1.],
        [1., 3., 2., 2., 1., 1., 0., 4., 1., 1.],
        [1., 1., 1., 1., 1., 1., 1., 1., 1., 1.],
        [1., 0., 0., 0., 1., 1., 1., 1., 1., 1.],
        [1., 0., 7., 7., 1., 1., 1., 1., 1., 1.],
        [1., 0., 7., 7., 1., 1., 1., 1., 1., 1.],
        [1., 1., 1., 1., 1., 1., 1., 1., 1., 1.],
        [1., 1., 1., 1., 1., 1., 1., 1., 1., 1.],
    ])
}

/// The 3x3 blocks A, B and C of [`reference_matrix`].
pub fn reference_submatrices() -> [Array2<f64>; 3] {
    let m = reference_matrix();
    [
        m.slice(s![1..4, 1..4]).to_owned(),
        m.slice(s![6..9, 1..4]).to_owned(),
        m.slice(s![1..4, 5..8]).to_owned(),
    ]
}
