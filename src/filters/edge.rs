//! Edge detection filters: Sobel, Prewitt, Roberts, Kirsch.
//!
//! Each operator convolves the plane with its directional kernels and
//! combines the responses:
//! - **Sobel / Prewitt / Roberts**: Euclidean magnitude `sqrt(gx² + gy²)`
//! - **Kirsch**: per-pixel maximum over eight compass directions
//!
//! ## Supported Formats
//!
//! Images with 1, 3, or 4 channels. Each color channel is processed
//! independently, alpha is preserved.
//!
//! All operators use [`Boundary::Replicate`], so a flat region produces no
//! response, including along the image border.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Zip};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::convolve::{convolve, Boundary, Kernel};
use crate::error::{ImageLabError, Result};
use crate::grid::{map_color_planes, quantize, Plane};

// ============================================================================
// Kernels
// ============================================================================

type Kernel3 = [[f64; 3]; 3];

const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const PREWITT_X: Kernel3 = [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]];
const PREWITT_Y: Kernel3 = [[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

// Roberts cross is 2x2; it sits in the top-left corner so the response at
// (y, x) combines samples (y-1, x-1) through (y, x).
const ROBERTS_X: Kernel3 = [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 0.0]];
const ROBERTS_Y: Kernel3 = [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];

// N, NW, W, SW, S, SE, E, NE
const KIRSCH: [Kernel3; 8] = [
    [[5.0, 5.0, 5.0], [-3.0, 0.0, -3.0], [-3.0, -3.0, -3.0]],
    [[5.0, 5.0, -3.0], [5.0, 0.0, -3.0], [-3.0, -3.0, -3.0]],
    [[5.0, -3.0, -3.0], [5.0, 0.0, -3.0], [5.0, -3.0, -3.0]],
    [[-3.0, -3.0, -3.0], [5.0, 0.0, -3.0], [5.0, 5.0, -3.0]],
    [[-3.0, -3.0, -3.0], [-3.0, 0.0, -3.0], [5.0, 5.0, 5.0]],
    [[-3.0, -3.0, -3.0], [-3.0, 0.0, 5.0], [-3.0, 5.0, 5.0]],
    [[-3.0, -3.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, 5.0]],
    [[-3.0, 5.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, -3.0]],
];

// ============================================================================
// Operator selection
// ============================================================================

/// Gradient-based edge operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOperator {
    Sobel,
    Prewitt,
    Roberts,
    Kirsch,
}

impl EdgeOperator {
    pub const ALL: [EdgeOperator; 4] = [
        EdgeOperator::Sobel,
        EdgeOperator::Prewitt,
        EdgeOperator::Roberts,
        EdgeOperator::Kirsch,
    ];

    /// Boundary policy shared by every gradient operator.
    pub const BOUNDARY: Boundary = Boundary::Replicate;

    pub fn name(self) -> &'static str {
        match self {
            EdgeOperator::Sobel => "sobel",
            EdgeOperator::Prewitt => "prewitt",
            EdgeOperator::Roberts => "roberts",
            EdgeOperator::Kirsch => "kirsch",
        }
    }

    /// Directional kernels: (x, y) for the magnitude operators, eight
    /// compass kernels for Kirsch.
    pub fn kernels(self) -> Vec<Kernel> {
        let rows: &[Kernel3] = match self {
            EdgeOperator::Sobel => &[SOBEL_X, SOBEL_Y],
            EdgeOperator::Prewitt => &[PREWITT_X, PREWITT_Y],
            EdgeOperator::Roberts => &[ROBERTS_X, ROBERTS_Y],
            EdgeOperator::Kirsch => &KIRSCH,
        };
        rows.iter().map(|k| Kernel::from_3x3(*k)).collect()
    }
}

impl fmt::Display for EdgeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeOperator {
    type Err = ImageLabError;

    fn from_str(s: &str) -> Result<Self> {
        EdgeOperator::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ImageLabError::UnknownFilter(s.to_string()))
    }
}

// ============================================================================
// Gradient magnitude
// ============================================================================

/// Raw (unclipped) edge strength of a plane.
pub fn gradient_magnitude(input: ArrayView2<f64>, op: EdgeOperator) -> Result<Plane> {
    let responses = op
        .kernels()
        .par_iter()
        .map(|k| convolve(input, k, EdgeOperator::BOUNDARY))
        .collect::<Result<Vec<Plane>>>()?;

    let magnitude = match op {
        EdgeOperator::Kirsch => {
            let mut max = responses[0].clone();
            for r in &responses[1..] {
                Zip::from(&mut max).and(r).for_each(|m, &v| *m = m.max(v));
            }
            max
        }
        _ => {
            let mut mag = Plane::zeros(input.dim());
            Zip::from(&mut mag)
                .and(&responses[0])
                .and(&responses[1])
                .for_each(|m, &gx, &gy| *m = (gx * gx + gy * gy).sqrt());
            mag
        }
    };
    Ok(magnitude)
}

/// Turn an edge strength plane into an image channel.
///
/// With a threshold the result is binary (`> threshold` → 255), otherwise the
/// strength is clipped into 0-255.
pub fn edge_map(magnitude: &Plane, threshold: Option<f64>) -> Array2<u8> {
    match threshold {
        Some(t) => magnitude.mapv(|m| if m > t { 255 } else { 0 }),
        None => quantize(magnitude),
    }
}

/// Apply an edge operator to every color channel.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `op` - Edge operator
/// * `threshold` - Optional binarization threshold on the magnitude
///
/// # Returns
/// Edge image with the same channel count
pub fn detect_edges(
    input: ArrayView3<u8>,
    op: EdgeOperator,
    threshold: Option<f64>,
) -> Result<Array3<u8>> {
    log::debug!("detect_edges: op={} threshold={:?}", op, threshold);
    map_color_planes(input, |channel| {
        let magnitude = gradient_magnitude(channel.mapv(f64::from).view(), op)?;
        Ok(edge_map(&magnitude, threshold))
    })
}
