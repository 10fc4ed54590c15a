#![allow(dead_code)]

use ndarray::Array3;

/// Horizontal ramp with `step` levels per column.
pub fn ramp_gray(width: usize, height: usize, step: usize) -> Array3<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    Array3::from_shape_fn((height, width, 1), |(_, x, _)| ((x * step) % 256) as u8)
}

/// Deterministic textured RGBA image with a varying alpha channel.
pub fn textured_rgba(width: usize, height: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 4), |(y, x, c)| match c {
        0 => ((x * 17 + y * 5) % 256) as u8,
        1 => ((x * y + 40) % 256) as u8,
        2 => if (x / 3 + y / 3) % 2 == 0 { 30 } else { 210 },
        _ => ((x + y) * 9 % 256) as u8,
    })
}

/// Simple high-contrast checkerboard.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> Array3<u8> {
    assert!(cell > 0, "cell size must be positive");
    Array3::from_shape_fn((height, width, 1), |(y, x, _)| {
        if (x / cell + y / cell) % 2 == 0 {
            32
        } else {
            220
        }
    })
}

/// Mean absolute difference between two images of the same shape.
pub fn mean_abs_error(a: &Array3<u8>, b: &Array3<u8>) -> f64 {
    assert_eq!(a.dim(), b.dim());
    let total: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&p, &q)| (p as f64 - q as f64).abs())
        .sum();
    total / a.len() as f64
}

/// Population standard deviation over every sample of an image.
pub fn std_dev(img: &Array3<u8>) -> f64 {
    let n = img.len() as f64;
    let mean = img.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = img
        .iter()
        .map(|&v| (v as f64 - mean) * (v as f64 - mean))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
