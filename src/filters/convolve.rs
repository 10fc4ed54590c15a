//! Generic 2D linear filtering.
//!
//! The kernel is centered on each output position (`center = size / 2`) and
//! the weighted sum `Σ region · kernel` is taken without flipping the kernel.
//! Samples that fall outside the plane are synthesized by a [`Boundary`]
//! policy. Results are returned as raw `f64` values: callers decide whether
//! to take absolute values, clip or combine them further.

use std::fmt;
use std::str::FromStr;

use ndarray::{arr2, Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{ImageLabError, Result};
use crate::grid::{validate_plane, Plane};

/// Rule for synthesizing samples outside the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Outside samples are 0.
    Zero,
    /// Outside samples repeat the nearest edge sample.
    #[default]
    Replicate,
    /// Mirror about the edge sample without repeating it (`3 2 | 1 2 3 | 2 1`).
    Reflect,
}

impl Boundary {
    pub const ALL: [Boundary; 3] = [Boundary::Zero, Boundary::Replicate, Boundary::Reflect];

    pub fn name(self) -> &'static str {
        match self {
            Boundary::Zero => "zero",
            Boundary::Replicate => "replicate",
            Boundary::Reflect => "reflect",
        }
    }

    /// Map a possibly out-of-range index onto an axis of length `len`.
    ///
    /// `None` means the sample is zero.
    #[inline]
    pub fn resolve(self, index: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        if (0..n).contains(&index) {
            return Some(index as usize);
        }
        match self {
            Boundary::Zero => None,
            Boundary::Replicate => Some(index.clamp(0, n - 1) as usize),
            Boundary::Reflect => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * (n - 1);
                let mut i = index.rem_euclid(period);
                if i >= n {
                    i = period - i;
                }
                Some(i as usize)
            }
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Boundary {
    type Err = ImageLabError;

    fn from_str(s: &str) -> Result<Self> {
        Boundary::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ImageLabError::UnknownFilter(format!("boundary {}", s)))
    }
}

/// Immutable odd-sized weight matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Build a kernel, rejecting empty or even-sized weight matrices.
    pub fn new(weights: Array2<f64>) -> Result<Self> {
        let (h, w) = weights.dim();
        if h == 0 || w == 0 || h % 2 == 0 || w % 2 == 0 {
            return Err(ImageLabError::invalid_parameter(format!(
                "kernel dimensions must be odd, got {}x{}",
                h, w
            )));
        }
        Ok(Kernel { weights })
    }

    /// 3x3 kernel from literal rows.
    pub fn from_3x3(rows: [[f64; 3]; 3]) -> Self {
        Kernel {
            weights: arr2(&rows),
        }
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.weights.dim()
    }

    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }

    /// Same kernel with every weight negated.
    pub fn negated(&self) -> Kernel {
        Kernel {
            weights: self.weights.mapv(|w| -w),
        }
    }
}

fn check_fits(input: ArrayView2<f64>, kernel: &Kernel) -> Result<()> {
    validate_plane(input)?;
    let (height, width) = input.dim();
    let (kh, kw) = kernel.dim();
    if kh > height || kw > width {
        return Err(ImageLabError::ShapeMismatch(format!(
            "kernel {}x{} is larger than plane {}x{}",
            kh, kw, height, width
        )));
    }
    Ok(())
}

/// Weighted sum of the kernel centered at (y, x).
#[inline]
fn sample_at(
    input: ArrayView2<f64>,
    kernel: ArrayView2<f64>,
    boundary: Boundary,
    y: usize,
    x: usize,
) -> f64 {
    let (height, width) = input.dim();
    let (kh, kw) = kernel.dim();
    let (cy, cx) = ((kh / 2) as isize, (kw / 2) as isize);

    let mut sum = 0.0;
    for ky in 0..kh {
        let Some(sy) = boundary.resolve(y as isize + ky as isize - cy, height) else {
            continue;
        };
        for kx in 0..kw {
            if let Some(sx) = boundary.resolve(x as isize + kx as isize - cx, width) {
                sum += input[[sy, sx]] * kernel[[ky, kx]];
            }
        }
    }
    sum
}

/// Filter a plane with a kernel. Output has the same shape as the input.
///
/// # Errors
/// * `InvalidShape` for an empty plane
/// * `ShapeMismatch` when the kernel is larger than the plane
pub fn convolve(input: ArrayView2<f64>, kernel: &Kernel, boundary: Boundary) -> Result<Plane> {
    check_fits(input, kernel)?;
    let weights = kernel.weights();
    let mut output = Plane::zeros(input.dim());

    Zip::indexed(&mut output).par_for_each(|(y, x), out| {
        *out = sample_at(input, weights, boundary, y, x);
    });

    Ok(output)
}

/// Value at one position plus the expanded formula that produced it.
///
/// Coordinates in the formula are 1-based: `I(3,3) = 10*1 + ... = 60`.
pub fn explain_sample(
    input: ArrayView2<f64>,
    kernel: &Kernel,
    boundary: Boundary,
    row: usize,
    col: usize,
) -> Result<(f64, String)> {
    check_fits(input, kernel)?;
    let (height, width) = input.dim();
    if row >= height || col >= width {
        return Err(ImageLabError::invalid_parameter(format!(
            "position ({}, {}) is outside a {}x{} plane",
            row, col, height, width
        )));
    }

    let (kh, kw) = kernel.dim();
    let (cy, cx) = ((kh / 2) as isize, (kw / 2) as isize);
    let mut terms = Vec::with_capacity(kh * kw);
    for ky in 0..kh {
        for kx in 0..kw {
            let sy = boundary.resolve(row as isize + ky as isize - cy, height);
            let sx = boundary.resolve(col as isize + kx as isize - cx, width);
            let sample = match (sy, sx) {
                (Some(sy), Some(sx)) => input[[sy, sx]],
                _ => 0.0,
            };
            terms.push(format!("{}*{}", sample, kernel.weights[[ky, kx]]));
        }
    }

    let value = sample_at(input, kernel.weights(), boundary, row, col);
    let formula = format!(
        "I({},{}) = {} = {}",
        row + 1,
        col + 1,
        terms.join(" + "),
        value
    );
    Ok((value, formula))
}
