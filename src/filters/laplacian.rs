//! Second-derivative filters: Laplacian, Laplacian of Gaussian, sharpening,
//! and the 3x3 Gaussian smoothing they share.
//!
//! Every filter in this family uses [`Boundary::Replicate`].
//!
//! ## Sharpening duality
//!
//! A negative-center kernel responds with the opposite sign of its
//! positive-center twin, so `original − response(neg)` and
//! `original + response(pos)` are the same image.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView2, ArrayView3, Zip};
use serde::{Deserialize, Serialize};

use super::convolve::{convolve, Boundary, Kernel};
use super::edge::{detect_edges, EdgeOperator};
use crate::error::{ImageLabError, Result};
use crate::grid::{map_color_planes, quantize, Plane};

/// Boundary policy for the Laplacian family and Gaussian smoothing.
pub const BOUNDARY: Boundary = Boundary::Replicate;

const GAUSSIAN_3X3: [[f64; 3]; 3] = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// Laplacian kernel variant: neighborhood and sign of the center weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaplacianKernel {
    /// `[0 1 0; 1 -4 1; 0 1 0]`
    #[default]
    FourNegative,
    /// `[1 1 1; 1 -8 1; 1 1 1]`
    EightNegative,
    /// `[0 -1 0; -1 4 -1; 0 -1 0]`
    FourPositive,
    /// `[-1 -1 -1; -1 8 -1; -1 -1 -1]`
    EightPositive,
}

impl LaplacianKernel {
    pub const ALL: [LaplacianKernel; 4] = [
        LaplacianKernel::FourNegative,
        LaplacianKernel::EightNegative,
        LaplacianKernel::FourPositive,
        LaplacianKernel::EightPositive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LaplacianKernel::FourNegative => "4n_neg",
            LaplacianKernel::EightNegative => "8n_neg",
            LaplacianKernel::FourPositive => "4n_pos",
            LaplacianKernel::EightPositive => "8n_pos",
        }
    }

    pub fn center_is_negative(self) -> bool {
        matches!(
            self,
            LaplacianKernel::FourNegative | LaplacianKernel::EightNegative
        )
    }

    /// Kernel with the same neighborhood and the opposite center sign.
    pub fn twin(self) -> LaplacianKernel {
        match self {
            LaplacianKernel::FourNegative => LaplacianKernel::FourPositive,
            LaplacianKernel::EightNegative => LaplacianKernel::EightPositive,
            LaplacianKernel::FourPositive => LaplacianKernel::FourNegative,
            LaplacianKernel::EightPositive => LaplacianKernel::EightNegative,
        }
    }

    pub fn kernel(self) -> Kernel {
        let negative = match self {
            LaplacianKernel::FourNegative | LaplacianKernel::FourPositive => {
                Kernel::from_3x3([[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]])
            }
            LaplacianKernel::EightNegative | LaplacianKernel::EightPositive => {
                Kernel::from_3x3([[1.0, 1.0, 1.0], [1.0, -8.0, 1.0], [1.0, 1.0, 1.0]])
            }
        };
        if self.center_is_negative() {
            negative
        } else {
            negative.negated()
        }
    }
}

impl fmt::Display for LaplacianKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaplacianKernel {
    type Err = ImageLabError;

    fn from_str(s: &str) -> Result<Self> {
        LaplacianKernel::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ImageLabError::UnknownFilter(s.to_string()))
    }
}

/// Normalized 3x3 Gaussian smoothing kernel.
pub fn gaussian_kernel() -> Kernel {
    Kernel::from_3x3(GAUSSIAN_3X3)
}

/// Raw signed Laplacian response of a plane.
pub fn laplacian_response(input: ArrayView2<f64>, kind: LaplacianKernel) -> Result<Plane> {
    convolve(input, &kind.kernel(), BOUNDARY)
}

/// Laplacian edge image: `|response|` clipped to 0-255.
pub fn laplacian(input: ArrayView3<u8>, kind: LaplacianKernel) -> Result<Array3<u8>> {
    map_color_planes(input, |channel| {
        let response = laplacian_response(channel.mapv(f64::from).view(), kind)?;
        Ok(quantize(&response.mapv(f64::abs)))
    })
}

/// Smooth with the 3x3 Gaussian.
pub fn gaussian_smooth(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    let kernel = gaussian_kernel();
    map_color_planes(input, |channel| {
        let smoothed = convolve(channel.mapv(f64::from).view(), &kernel, BOUNDARY)?;
        Ok(quantize(&smoothed))
    })
}

/// Laplacian of Gaussian: smoothing first, then the Laplacian.
pub fn laplacian_of_gaussian(input: ArrayView3<u8>, kind: LaplacianKernel) -> Result<Array3<u8>> {
    let smoothed = gaussian_smooth(input)?;
    laplacian(smoothed.view(), kind)
}

/// Gaussian smoothing followed by a gradient edge operator.
pub fn smoothed_edges(
    input: ArrayView3<u8>,
    op: EdgeOperator,
    threshold: Option<f64>,
) -> Result<Array3<u8>> {
    let smoothed = gaussian_smooth(input)?;
    detect_edges(smoothed.view(), op, threshold)
}

/// Laplacian sharpening.
///
/// Negative-center kernels subtract the response from the original,
/// positive-center kernels add it.
pub fn sharpen(input: ArrayView3<u8>, kind: LaplacianKernel) -> Result<Array3<u8>> {
    let sign = if kind.center_is_negative() { -1.0 } else { 1.0 };
    map_color_planes(input, |channel| {
        let original = channel.mapv(f64::from);
        let mut sharpened = laplacian_response(original.view(), kind)?;
        Zip::from(&mut sharpened)
            .and(&original)
            .for_each(|s, &o| *s = o + sign * *s);
        Ok(quantize(&sharpened))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_image() -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((12, 12, 1));
        for y in 4..8 {
            for x in 4..8 {
                img[[y, x, 0]] = 200;
            }
        }
        img
    }

    #[test]
    fn test_kernels_sum_to_zero() {
        for kind in LaplacianKernel::ALL {
            assert_eq!(kind.kernel().sum(), 0.0, "{}", kind);
        }
        assert!((gaussian_kernel().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_laplacian_flat_is_zero() {
        let img = Array3::<u8>::from_elem((5, 5, 3), 128);
        for kind in LaplacianKernel::ALL {
            let result = laplacian(img.view(), kind).unwrap();
            assert!(result.iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn test_laplacian_marks_square_outline() {
        let result = laplacian(square_image().view(), LaplacianKernel::FourNegative).unwrap();
        // Corner of the square: two dark 4-neighbors
        assert_eq!(result[[4, 4, 0]], 255);
        // Inside and far outside stay dark
        assert_eq!(result[[5, 5, 0]], 0);
        assert_eq!(result[[0, 0, 0]], 0);
    }

    #[test]
    fn test_sharpening_duality() {
        let mut img = Array3::<u8>::zeros((9, 9, 3));
        for y in 0..9 {
            for x in 0..9 {
                img[[y, x, 0]] = (x * 25) as u8;
                img[[y, x, 1]] = ((x * y * 7) % 256) as u8;
                img[[y, x, 2]] = if (x + y) % 3 == 0 { 230 } else { 40 };
            }
        }
        for kind in [LaplacianKernel::FourNegative, LaplacianKernel::EightNegative] {
            let a = sharpen(img.view(), kind).unwrap();
            let b = sharpen(img.view(), kind.twin()).unwrap();
            assert_eq!(a, b, "{} vs {}", kind, kind.twin());
        }
    }

    #[test]
    fn test_sharpen_boosts_edge_contrast() {
        let result = sharpen(square_image().view(), LaplacianKernel::FourNegative).unwrap();
        // Dark pixel next to the square gets darker (clipped), bright corner brighter
        assert_eq!(result[[3, 4, 0]], 0);
        assert_eq!(result[[4, 4, 0]], 255);
    }

    #[test]
    fn test_log_is_smoother_than_plain_laplacian() {
        let mut img = square_image();
        img[[1, 1, 0]] = 60;
        let plain = laplacian(img.view(), LaplacianKernel::FourNegative).unwrap();
        let log = laplacian_of_gaussian(img.view(), LaplacianKernel::FourNegative).unwrap();
        assert!(log[[1, 1, 0]] < plain[[1, 1, 0]]);
    }

    #[test]
    fn test_gaussian_smooth_keeps_shape() {
        let result = gaussian_smooth(square_image().view()).unwrap();
        assert_eq!(result.dim(), (12, 12, 1));
        assert!(result[[4, 4, 0]] < 200 && result[[4, 4, 0]] > 0);
    }

    #[test]
    fn test_smoothed_edges() {
        let result =
            smoothed_edges(square_image().view(), EdgeOperator::Sobel, Some(50.0)).unwrap();
        assert_eq!(result[[5, 4, 0]], 255);
        assert_eq!(result[[0, 11, 0]], 0);
    }

    #[test]
    fn test_parse_kernel_names() {
        assert_eq!(
            "8n_pos".parse::<LaplacianKernel>().unwrap(),
            LaplacianKernel::EightPositive
        );
        assert!("16n".parse::<LaplacianKernel>().is_err());
    }
}
