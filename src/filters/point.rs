//! Point transforms: Invert, Log, Inverse Log, Gamma.
//!
//! These are pixel-wise operations that don't require spatial context. Each
//! color channel is turned into a 256-entry lookup table over the normalized
//! level `r = v / 255`:
//!
//! | Transform   | Raw value                 | Output                 |
//! |-------------|---------------------------|------------------------|
//! | Invert      | `1 − r`                   | `255 − v`              |
//! | Log         | `c · ln(1 + r) / ln(base)`| min-max to 0-255       |
//! | Inverse Log | `base^(r / c) − 1`        | min-max to 0-255       |
//! | Gamma       | `c · r^γ`                 | `× 255`, clipped       |
//!
//! The min-max range of Log and Inverse Log is taken over the levels present
//! in the channel. A channel whose range collapses is left unchanged.
//!
//! ## Supported Formats
//!
//! All transforms accept images with 1, 3, or 4 channels. Alpha channel (if
//! present) is always preserved unchanged.

use ndarray::{Array3, ArrayView2, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::{ImageLabError, Result};
use crate::grid::{map_color_planes, quantize_sample};
use crate::histogram::{Histogram, LevelMap};

/// Intensity transform selection and parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PointTransform {
    #[default]
    Invert,
    Log { c: f64, base: f64 },
    InverseLog { c: f64, base: f64 },
    Gamma { c: f64, gamma: f64 },
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ImageLabError::invalid_parameter(format!(
            "{} must be finite, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_base(base: f64) -> Result<()> {
    check_finite("base", base)?;
    if base <= 0.0 || base == 1.0 {
        return Err(ImageLabError::invalid_parameter(format!(
            "logarithm base must be positive and not 1, got {}",
            base
        )));
    }
    Ok(())
}

impl PointTransform {
    pub fn name(&self) -> &'static str {
        match self {
            PointTransform::Invert => "invert",
            PointTransform::Log { .. } => "log",
            PointTransform::InverseLog { .. } => "inverse_log",
            PointTransform::Gamma { .. } => "gamma",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            PointTransform::Invert => Ok(()),
            PointTransform::Log { c, base } => {
                check_finite("c", c)?;
                check_base(base)
            }
            PointTransform::InverseLog { c, base } => {
                check_finite("c", c)?;
                if c == 0.0 {
                    return Err(ImageLabError::invalid_parameter(
                        "inverse log needs a non-zero c",
                    ));
                }
                check_base(base)
            }
            PointTransform::Gamma { c, gamma } => {
                check_finite("c", c)?;
                check_finite("gamma", gamma)?;
                if gamma <= 0.0 {
                    return Err(ImageLabError::invalid_parameter(format!(
                        "gamma must be positive, got {}",
                        gamma
                    )));
                }
                Ok(())
            }
        }
    }

    /// Transform of a normalized level, before any rescaling.
    fn raw(&self, r: f64) -> f64 {
        match *self {
            PointTransform::Invert => 1.0 - r,
            PointTransform::Log { c, base } => c * (1.0 + r).ln() / base.ln(),
            PointTransform::InverseLog { c, base } => base.powf(r / c) - 1.0,
            PointTransform::Gamma { c, gamma } => c * r.powf(gamma),
        }
    }

    /// Lookup table for one channel. Parameters must already be validated.
    pub fn level_map(&self, channel: ArrayView2<u8>) -> LevelMap {
        let raw: [f64; 256] = std::array::from_fn(|v| self.raw(v as f64 / 255.0));
        match self {
            PointTransform::Invert => LevelMap::from_fn(|v| 255 - v),
            PointTransform::Gamma { .. } => {
                LevelMap::from_fn(|v| quantize_sample(raw[v as usize] * 255.0))
            }
            PointTransform::Log { .. } => {
                let (lo, hi) = present_range(channel, &raw);
                let range = hi - lo;
                if !range.is_finite() || range <= 0.0 {
                    log::debug!(
                        "{}: channel has no dynamic range, left unchanged",
                        self.name()
                    );
                    return LevelMap::identity();
                }
                LevelMap::from_fn(|v| quantize_sample((raw[v as usize] - lo) / range * 255.0))
            }
            PointTransform::InverseLog { c, base } => {
                // base^(r/c) overflows for small c, so normalize on the exponent:
                // (e^a - e^lo) / (e^hi - e^lo) = (e^(a-hi) - e^(lo-hi)) / (1 - e^(lo-hi))
                let exponent: [f64; 256] =
                    std::array::from_fn(|v| v as f64 / 255.0 / c * base.ln());
                let (lo, hi) = present_range(channel, &exponent);
                let floor = (lo - hi).exp();
                if !(hi - lo).is_finite() || hi <= lo || floor >= 1.0 {
                    log::debug!(
                        "{}: channel has no dynamic range, left unchanged",
                        self.name()
                    );
                    return LevelMap::identity();
                }
                LevelMap::from_fn(|v| {
                    let scaled = ((exponent[v as usize] - hi).exp() - floor) / (1.0 - floor);
                    quantize_sample(scaled * 255.0)
                })
            }
        }
    }
}

/// Smallest and largest value of `table` over the levels present in `channel`.
fn present_range(channel: ArrayView2<u8>, table: &[f64; 256]) -> (f64, f64) {
    let hist = Histogram::from_channel(channel);
    (0..256)
        .filter(|&v| hist.counts()[v] > 0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(table[v]), hi.max(table[v]))
        })
}

/// Apply a point transform to every color channel.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `transform` - Transform and its parameters
///
/// # Returns
/// Transformed image with same channel count
pub fn apply_point_transform(
    input: ArrayView3<u8>,
    transform: &PointTransform,
) -> Result<Array3<u8>> {
    transform.validate()?;
    map_color_planes(input, |channel| {
        Ok(transform.level_map(channel).apply(channel))
    })
}
