//! Two-dimensional discrete Fourier transform and spectrum display helpers.
//!
//! The transform is computed densely as `F = W_M · f · W_N` with twiddle
//! matrices `W_n[u, x] = exp(−2πi·u·x / n)`. It is O(M²N + MN²) and serves
//! as the reference transform for the small images this crate targets.

use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2, ArrayView3, Zip};
use num_complex::Complex64;

use crate::error::{ImageLabError, Result};
use crate::grid::{luminance, validate_image, validate_plane, Plane};

/// Complex frequency-domain plane, same shape as its source.
pub type Spectrum = Array2<Complex64>;

/// Forward (`sign = -1`) or inverse (`sign = +1`) twiddle matrix of size n×n.
pub fn dft_matrix(n: usize, sign: f64) -> Array2<Complex64> {
    Array2::from_shape_fn((n, n), |(u, x)| {
        // Reduce the exponent first so large products keep their precision
        let k = ((u * x) % n) as f64;
        Complex64::from_polar(1.0, sign * 2.0 * PI * k / n as f64)
    })
}

/// Forward transform of a real plane.
pub fn dft(input: ArrayView2<f64>) -> Result<Spectrum> {
    validate_plane(input)?;
    let (m, n) = input.dim();
    let f = input.mapv(|v| Complex64::new(v, 0.0));
    Ok(dft_matrix(m, -1.0).dot(&f).dot(&dft_matrix(n, -1.0)))
}

/// Inverse transform, scaled by `1 / (M·N)`; the real part is returned.
pub fn idft(spectrum: ArrayView2<Complex64>) -> Result<Plane> {
    validate_plane(spectrum)?;
    let (m, n) = spectrum.dim();
    let scale = 1.0 / (m * n) as f64;
    let f = dft_matrix(m, 1.0).dot(&spectrum).dot(&dft_matrix(n, 1.0));
    Ok(f.mapv(|c| c.re * scale))
}

fn check_even<T>(input: ArrayView2<T>) -> Result<()> {
    validate_plane(input)?;
    let (m, n) = input.dim();
    if m % 2 != 0 || n % 2 != 0 {
        return Err(ImageLabError::InvalidShape(format!(
            "quadrant shift needs even dimensions, got {}x{}",
            m, n
        )));
    }
    Ok(())
}

/// Swap diagonal quadrants so the zero frequency moves to the center.
///
/// Only even dimensions are accepted, which makes the shift its own inverse.
pub fn shift<T: Clone>(input: ArrayView2<T>) -> Result<Array2<T>> {
    check_even(input)?;
    let (m, n) = input.dim();
    let (cm, cn) = (m / 2, n / 2);
    Ok(Array2::from_shape_fn((m, n), |(y, x)| {
        input[[(y + cm) % m, (x + cn) % n]].clone()
    }))
}

/// Centered spectrum: modulate by `(−1)^(x+y)`, then transform.
///
/// Equal to `shift(dft(input))`; even dimensions only.
pub fn centered_dft(input: ArrayView2<f64>) -> Result<Spectrum> {
    check_even(input)?;
    let mut modulated = input.to_owned();
    Zip::indexed(&mut modulated).for_each(|(y, x), v| {
        if (y + x) % 2 == 1 {
            *v = -*v;
        }
    });
    dft(modulated.view())
}

/// Display form of a spectrum: `ln(1 + |F|)` scaled so the maximum is 255.
pub fn log_spectrum(spectrum: ArrayView2<Complex64>) -> Array2<u8> {
    let magnitude = spectrum.mapv(|c| c.norm().ln_1p());
    let max = magnitude.fold(0.0f64, |m, &v| m.max(v));
    if max <= 0.0 {
        log::debug!("log_spectrum: all-zero spectrum");
        return Array2::zeros(spectrum.dim());
    }
    magnitude.mapv(|v| (v / max * 255.0).round().clamp(0.0, 255.0) as u8)
}

/// Log-magnitude spectrum of an image's luminance.
///
/// With `centered` the zero frequency is moved to the middle, which needs
/// even image dimensions.
pub fn image_spectrum(input: ArrayView3<u8>, centered: bool) -> Result<Array2<u8>> {
    validate_image(input)?;
    let luma = luminance(input);
    let (m, n) = luma.dim();
    log::debug!("image_spectrum: {}x{} centered={}", m, n, centered);
    let spectrum = if centered {
        centered_dft(luma.view())?
    } else {
        dft(luma.view())?
    };
    Ok(log_spectrum(spectrum.view()))
}
