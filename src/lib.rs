//! imagelab - classic image processing on small `u8` images.
//!
//! Convolution-based filters, histogram processing, a reference 2D DFT and
//! image quality metrics, with Python bindings via PyO3 and WASM bindings
//! for JavaScript.
//!
//! ## Image Format
//! Images are `ndarray::Array3<u8>` with shape (height, width, channels):
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Operations process each color channel independently and carry alpha
//! through unchanged. Intermediate results are `f64` planes that are rounded
//! and clamped back to 0-255 only at the end.
//!
//! ## Modules
//! - [`filters`]: convolution engine, edge/Laplacian filters, noise filters,
//!   point transforms, contrast stretch, basic operations
//! - [`histogram`]: equalization, matching, adaptive equalization
//! - [`frequency`]: DFT, inverse DFT, quadrant shift, display spectrum
//! - [`metrics`]: brightness, contrast, entropy, sharpness
//! - `io` (feature `io`): load and save image files
//!
//! ## Example
//! ```
//! use imagelab::filters::edge::{detect_edges, EdgeOperator};
//! use ndarray::Array3;
//!
//! let img = Array3::<u8>::from_elem((8, 8, 3), 128);
//! let edges = detect_edges(img.view(), EdgeOperator::Sobel, None).unwrap();
//! assert!(edges.iter().all(|&v| v == 0));
//! ```

pub mod error;
pub mod filters;
pub mod frequency;
pub mod grid;
pub mod histogram;
pub mod metrics;

#[cfg(feature = "io")]
pub mod io;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{ImageLabError, Result};
pub use filters::convolve::{convolve, Boundary, Kernel};
pub use filters::edge::EdgeOperator;
pub use filters::laplacian::LaplacianKernel;
pub use filters::point::PointTransform;
pub use histogram::{AdaptiveEqualization, Histogram, LevelMap};
pub use metrics::MetricsReport;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::ImageLabError;
    use crate::filters::convolve::{Boundary, Kernel};
    use crate::filters::edge::EdgeOperator;
    use crate::filters::laplacian::LaplacianKernel;
    use crate::filters::point::PointTransform;
    use crate::filters::{basic, contrast, convolve, edge, laplacian as laplacian_mod, noise, point};
    use crate::histogram::{self, AdaptiveEqualization};
    use crate::{frequency, metrics};

    impl From<ImageLabError> for PyErr {
        fn from(err: ImageLabError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    type Image<'py> = PyResult<Bound<'py, PyArray3<u8>>>;

    // ========================================================================
    // Convolution
    // ========================================================================

    /// Filter a float plane with an odd-sized kernel.
    ///
    /// `boundary` is one of "zero", "replicate", "reflect".
    #[pyfunction]
    #[pyo3(signature = (plane, kernel, boundary="replicate"))]
    pub fn convolve2d<'py>(
        py: Python<'py>,
        plane: PyReadonlyArray2<'py, f64>,
        kernel: PyReadonlyArray2<'py, f64>,
        boundary: &str,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let kernel = Kernel::new(kernel.as_array().to_owned())?;
        let boundary: Boundary = boundary.parse()?;
        let result = convolve::convolve(plane.as_array(), &kernel, boundary)?;
        Ok(result.into_pyarray(py))
    }

    /// Value at (row, col) and the expanded weighted-sum formula.
    #[pyfunction]
    #[pyo3(signature = (plane, kernel, row, col, boundary="zero"))]
    pub fn explain_sample(
        plane: PyReadonlyArray2<'_, f64>,
        kernel: PyReadonlyArray2<'_, f64>,
        row: usize,
        col: usize,
        boundary: &str,
    ) -> PyResult<(f64, String)> {
        let kernel = Kernel::new(kernel.as_array().to_owned())?;
        let boundary: Boundary = boundary.parse()?;
        let explained = convolve::explain_sample(plane.as_array(), &kernel, boundary, row, col)?;
        Ok(explained)
    }

    // ========================================================================
    // Edge and Laplacian filters
    // ========================================================================

    /// Edge map with "sobel", "prewitt", "roberts" or "kirsch".
    #[pyfunction]
    #[pyo3(signature = (image, operator="sobel", threshold=None))]
    pub fn detect_edges<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        operator: &str,
        threshold: Option<f64>,
    ) -> Image<'py> {
        let op: EdgeOperator = operator.parse()?;
        let result = edge::detect_edges(image.as_array(), op, threshold)?;
        Ok(result.into_pyarray(py))
    }

    /// Gaussian smoothing followed by an edge operator.
    #[pyfunction]
    #[pyo3(signature = (image, operator="sobel", threshold=None))]
    pub fn smoothed_edges<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        operator: &str,
        threshold: Option<f64>,
    ) -> Image<'py> {
        let op: EdgeOperator = operator.parse()?;
        let result = laplacian_mod::smoothed_edges(image.as_array(), op, threshold)?;
        Ok(result.into_pyarray(py))
    }

    /// Absolute Laplacian response; kernel is "4n_neg", "8n_neg", "4n_pos" or "8n_pos".
    #[pyfunction]
    #[pyo3(signature = (image, kernel="4n_neg"))]
    pub fn laplacian<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: &str,
    ) -> Image<'py> {
        let kind: LaplacianKernel = kernel.parse()?;
        let result = laplacian_mod::laplacian(image.as_array(), kind)?;
        Ok(result.into_pyarray(py))
    }

    /// Laplacian of the Gaussian-smoothed image.
    #[pyfunction]
    #[pyo3(signature = (image, kernel="4n_neg"))]
    pub fn laplacian_of_gaussian<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: &str,
    ) -> Image<'py> {
        let kind: LaplacianKernel = kernel.parse()?;
        let result = laplacian_mod::laplacian_of_gaussian(image.as_array(), kind)?;
        Ok(result.into_pyarray(py))
    }

    /// Laplacian sharpening.
    #[pyfunction]
    #[pyo3(signature = (image, kernel="4n_neg"))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: &str,
    ) -> Image<'py> {
        let kind: LaplacianKernel = kernel.parse()?;
        let result = laplacian_mod::sharpen(image.as_array(), kind)?;
        Ok(result.into_pyarray(py))
    }

    /// 3x3 Gaussian smoothing.
    #[pyfunction]
    pub fn gaussian_smooth<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> Image<'py> {
        let result = laplacian_mod::gaussian_smooth(image.as_array())?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Noise filters
    // ========================================================================

    /// Add salt (255) and pepper (0) noise.
    #[pyfunction]
    #[pyo3(signature = (image, salt=0.05, pepper=0.05, seed=0))]
    pub fn salt_and_pepper<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        salt: f64,
        pepper: f64,
        seed: u64,
    ) -> Image<'py> {
        let result = noise::add_salt_and_pepper(image.as_array(), salt, pepper, seed)?;
        Ok(result.into_pyarray(py))
    }

    /// Mean filter with an odd window.
    #[pyfunction]
    #[pyo3(signature = (image, size=3))]
    pub fn mean_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: usize,
    ) -> Image<'py> {
        let result = noise::mean_filter(image.as_array(), size)?;
        Ok(result.into_pyarray(py))
    }

    /// Median filter with an odd window.
    #[pyfunction]
    #[pyo3(signature = (image, size=3))]
    pub fn median_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: usize,
    ) -> Image<'py> {
        let result = noise::median_filter(image.as_array(), size)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Histogram processing
    // ========================================================================

    /// Global histogram equalization per color channel.
    #[pyfunction]
    pub fn equalize<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> Image<'py> {
        let result = histogram::equalize(image.as_array())?;
        Ok(result.into_pyarray(py))
    }

    /// Equalization walkthrough of one channel.
    #[pyfunction]
    #[pyo3(signature = (image, channel=0, label=None))]
    pub fn equalization_report(
        image: PyReadonlyArray3<'_, u8>,
        channel: usize,
        label: Option<&str>,
    ) -> PyResult<String> {
        let input = image.as_array();
        histogram::Histogram::of_image(input, channel)?;
        let plane = input.index_axis(ndarray::Axis(2), channel);
        Ok(histogram::EqualizationReport::new(plane, label).to_string())
    }

    /// Match the histogram of `image` to that of `reference`.
    #[pyfunction]
    pub fn match_histograms<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        reference: PyReadonlyArray3<'py, u8>,
    ) -> Image<'py> {
        let result = histogram::match_histograms(image.as_array(), reference.as_array())?;
        Ok(result.into_pyarray(py))
    }

    /// Local-statistics enhancement.
    #[pyfunction]
    #[pyo3(signature = (image, window=3, k0=0.0, k1=0.25, k2=0.0, k3=0.1, gain=50.0))]
    #[allow(clippy::too_many_arguments)]
    pub fn adaptive_equalize<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        window: usize,
        k0: f64,
        k1: f64,
        k2: f64,
        k3: f64,
        gain: f64,
    ) -> Image<'py> {
        let params = AdaptiveEqualization {
            window,
            k0,
            k1,
            k2,
            k3,
            gain,
        };
        let result = histogram::adaptive_equalize(image.as_array(), &params)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Pixel-wise transforms
    // ========================================================================

    /// Point transform: "invert", "log", "inverse_log" or "gamma".
    #[pyfunction]
    #[pyo3(signature = (image, op, c=1.0, base=10.0, gamma=1.0))]
    pub fn point_transform<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        op: &str,
        c: f64,
        base: f64,
        gamma: f64,
    ) -> Image<'py> {
        let transform = match op.trim().to_ascii_lowercase().as_str() {
            "invert" => PointTransform::Invert,
            "log" => PointTransform::Log { c, base },
            "inverse_log" | "invlog" => PointTransform::InverseLog { c, base },
            "gamma" => PointTransform::Gamma { c, gamma },
            _ => return Err(ImageLabError::UnknownFilter(op.to_string()).into()),
        };
        let result = point::apply_point_transform(image.as_array(), &transform)?;
        Ok(result.into_pyarray(py))
    }

    /// Linear contrast stretch of [r_min, r_max] to [0, 255].
    #[pyfunction]
    pub fn stretch_linear<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        r_min: u8,
        r_max: u8,
    ) -> Image<'py> {
        let result = contrast::stretch_linear(image.as_array(), r_min, r_max)?;
        Ok(result.into_pyarray(py))
    }

    /// Piecewise linear contrast stretch.
    #[pyfunction]
    #[pyo3(signature = (image, r_min, r_max, l0=50, l1=200))]
    pub fn stretch_piecewise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        r_min: u8,
        r_max: u8,
        l0: u8,
        l1: u8,
    ) -> Image<'py> {
        let result = contrast::stretch_piecewise(image.as_array(), r_min, r_max, l0, l1)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Frequency domain and metrics
    // ========================================================================

    /// Log-magnitude spectrum of the luminance, as a (H, W) u8 array.
    #[pyfunction]
    #[pyo3(signature = (image, centered=true))]
    pub fn spectrum<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        centered: bool,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let result = frequency::image_spectrum(image.as_array(), centered)?;
        Ok(result.into_pyarray(py))
    }

    /// (mean, contrast, entropy, sharpness) of the luminance.
    #[pyfunction]
    pub fn image_metrics(image: PyReadonlyArray3<'_, u8>) -> PyResult<(f64, f64, f64, f64)> {
        let m = metrics::image_metrics(image.as_array())?;
        Ok((m.mean, m.contrast, m.entropy, m.sharpness))
    }

    // ========================================================================
    // Basic operations
    // ========================================================================

    /// Single-channel BT.601 luminance.
    #[pyfunction]
    pub fn to_grayscale<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> Image<'py> {
        let result = basic::to_grayscale(image.as_array())?;
        Ok(result.into_pyarray(py))
    }

    /// Luminance >= threshold becomes 255, everything else 0.
    #[pyfunction]
    pub fn binary_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold: u8,
    ) -> Image<'py> {
        let result = basic::binary_threshold(image.as_array(), threshold)?;
        Ok(result.into_pyarray(py))
    }

    /// Keep red, zero green and blue.
    #[pyfunction]
    pub fn red_channel<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> Image<'py> {
        let result = basic::red_channel(image.as_array())?;
        Ok(result.into_pyarray(py))
    }

    /// Python module definition
    #[pymodule]
    pub fn imagelab(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Convolution
        m.add_function(wrap_pyfunction!(convolve2d, m)?)?;
        m.add_function(wrap_pyfunction!(explain_sample, m)?)?;

        // Edge and Laplacian filters
        m.add_function(wrap_pyfunction!(detect_edges, m)?)?;
        m.add_function(wrap_pyfunction!(smoothed_edges, m)?)?;
        m.add_function(wrap_pyfunction!(laplacian, m)?)?;
        m.add_function(wrap_pyfunction!(laplacian_of_gaussian, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_smooth, m)?)?;

        // Noise filters
        m.add_function(wrap_pyfunction!(salt_and_pepper, m)?)?;
        m.add_function(wrap_pyfunction!(mean_filter, m)?)?;
        m.add_function(wrap_pyfunction!(median_filter, m)?)?;

        // Histogram processing
        m.add_function(wrap_pyfunction!(equalize, m)?)?;
        m.add_function(wrap_pyfunction!(equalization_report, m)?)?;
        m.add_function(wrap_pyfunction!(match_histograms, m)?)?;
        m.add_function(wrap_pyfunction!(adaptive_equalize, m)?)?;

        // Pixel-wise transforms
        m.add_function(wrap_pyfunction!(point_transform, m)?)?;
        m.add_function(wrap_pyfunction!(stretch_linear, m)?)?;
        m.add_function(wrap_pyfunction!(stretch_piecewise, m)?)?;

        // Frequency domain and metrics
        m.add_function(wrap_pyfunction!(spectrum, m)?)?;
        m.add_function(wrap_pyfunction!(image_metrics, m)?)?;

        // Basic operations
        m.add_function(wrap_pyfunction!(to_grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(binary_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(red_channel, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imagelab;
