//! Spatial and pixel-wise filters.
//!
//! ## Supported Formats
//!
//! Every image filter accepts `u8` images with 1, 3, or 4 channels:
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | Grayscale8 | (H, W, 1) | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | RGB + alpha, 0-255 |
//!
//! Color channels are processed independently and alpha is always preserved.
//! Output has the same shape as the input unless stated otherwise
//! (grayscale conversion and thresholding return one channel).
//!
//! ## Filter Categories
//!
//! - **Linear**: convolve with an explicit [`convolve::Boundary`]
//! - **Edge detection**: sobel, prewitt, roberts, kirsch
//! - **Second derivative**: laplacian, laplacian of gaussian, sharpen
//! - **Noise**: salt and pepper, mean, median
//! - **Pixel-wise**: invert, log, inverse log, gamma, contrast stretch
//! - **Basic**: grayscale, binary threshold, red channel, alpha channel

pub mod basic;
pub mod contrast;
pub mod convolve;
pub mod edge;
pub mod laplacian;
pub mod noise;
pub mod point;
