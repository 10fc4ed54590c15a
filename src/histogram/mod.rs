//! Histogram engine: counting, cumulative distribution, level remapping.
//!
//! - **Equalization**: `sk = round(cdf[k] · 255)`
//! - **Matching**: `i → smallest j` with `cdf_ref[j] ≥ cdf_src[i]`
//! - **Adaptive equalization**: see [`adaptive`]
//!
//! Every mapping is a 256-entry [`LevelMap`] applied by table lookup, one
//! color channel at a time. Alpha is preserved.

pub mod adaptive;
pub mod report;

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{ImageLabError, Result};
use crate::grid::{color_channels, map_color_planes, validate_image};

pub use adaptive::{adaptive_equalize, AdaptiveEqualization};
pub use report::{format_matrix, EqualizationReport};

/// Number of intensity levels.
pub const LEVELS: usize = 256;

// ============================================================================
// Histogram
// ============================================================================

/// Pixel counts per intensity level of one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; LEVELS],
}

impl Histogram {
    /// Count the levels of a single channel.
    pub fn from_channel(channel: ArrayView2<u8>) -> Self {
        let mut counts = [0u64; LEVELS];
        for &v in channel.iter() {
            counts[v as usize] += 1;
        }
        Histogram { counts }
    }

    /// Count the levels of channel `c` of an image.
    pub fn of_image(input: ArrayView3<u8>, c: usize) -> Result<Self> {
        validate_image(input)?;
        let channels = input.dim().2;
        if c >= channels {
            return Err(ImageLabError::invalid_parameter(format!(
                "channel {} does not exist in a {}-channel image",
                c, channels
            )));
        }
        Ok(Self::from_channel(input.index_axis(Axis(2), c)))
    }

    pub fn counts(&self) -> &[u64; LEVELS] {
        &self.counts
    }

    /// Total pixel count (H × W of the source channel).
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of levels with at least one pixel.
    pub fn levels_used(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }

    /// Normalized cumulative distribution.
    ///
    /// The prefix sum is accumulated in integers and divided once, so equal
    /// histograms always give bit-identical CDFs.
    pub fn cdf(&self) -> Cdf {
        let total = self.total();
        let mut values = [0.0f64; LEVELS];
        if total == 0 {
            return Cdf { values };
        }
        let mut running = 0u64;
        for (k, &n) in self.counts.iter().enumerate() {
            running += n;
            values[k] = running as f64 / total as f64;
        }
        Cdf { values }
    }

    /// Counts after moving every pixel through `map`.
    pub fn remapped(&self, map: &LevelMap) -> Histogram {
        let mut counts = [0u64; LEVELS];
        for (k, &n) in self.counts.iter().enumerate() {
            counts[map.get(k as u8) as usize] += n;
        }
        Histogram { counts }
    }
}

/// Cumulative distribution over the 256 levels; non-decreasing, ends at 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Cdf {
    values: [f64; LEVELS],
}

impl Cdf {
    pub fn values(&self) -> &[f64; LEVELS] {
        &self.values
    }

    pub fn at(&self, level: u8) -> f64 {
        self.values[level as usize]
    }
}

// ============================================================================
// Level maps
// ============================================================================

/// 256-entry lookup table from input level to output level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelMap {
    table: [u8; LEVELS],
}

impl LevelMap {
    pub fn identity() -> Self {
        Self::from_fn(|v| v)
    }

    pub fn from_fn<F: FnMut(u8) -> u8>(mut f: F) -> Self {
        LevelMap {
            table: std::array::from_fn(|i| f(i as u8)),
        }
    }

    #[inline]
    pub fn get(&self, level: u8) -> u8 {
        self.table[level as usize]
    }

    pub fn table(&self) -> &[u8; LEVELS] {
        &self.table
    }

    pub fn is_monotonic(&self) -> bool {
        self.table.windows(2).all(|w| w[0] <= w[1])
    }

    /// Remap every sample of a channel.
    pub fn apply(&self, channel: ArrayView2<u8>) -> Array2<u8> {
        channel.mapv(|v| self.table[v as usize])
    }
}

// ============================================================================
// Global equalization
// ============================================================================

/// `sk = round(cdf[k] · 255)`; non-decreasing by construction.
pub fn equalization_map(hist: &Histogram) -> LevelMap {
    let cdf = hist.cdf();
    LevelMap::from_fn(|k| (cdf.at(k) * 255.0).round() as u8)
}

/// Histogram-equalize every color channel independently.
pub fn equalize(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    map_color_planes(input, |channel| {
        let map = equalization_map(&Histogram::from_channel(channel));
        Ok(map.apply(channel))
    })
}

// ============================================================================
// Histogram matching
// ============================================================================

/// Map each source level to the smallest reference level whose CDF reaches
/// the source CDF.
pub fn matching_map(source: &Histogram, reference: &Histogram) -> LevelMap {
    let src = source.cdf();
    let reference = reference.cdf();
    let mut j = 0usize;
    LevelMap::from_fn(|i| {
        // Source CDF is non-decreasing, so the search resumes where it stopped
        while j < LEVELS - 1 && reference.values[j] < src.at(i) {
            j += 1;
        }
        j as u8
    })
}

/// Reshape the histogram of every color channel of `source` to match the
/// same channel of `reference`.
///
/// The images may differ in size but must have the same number of color
/// channels.
pub fn match_histograms(source: ArrayView3<u8>, reference: ArrayView3<u8>) -> Result<Array3<u8>> {
    validate_image(source)?;
    validate_image(reference)?;
    let src_colors = color_channels(source.dim().2);
    let ref_colors = color_channels(reference.dim().2);
    if src_colors != ref_colors {
        return Err(ImageLabError::ShapeMismatch(format!(
            "source has {} color channels, reference has {}",
            src_colors, ref_colors
        )));
    }

    let mut c = 0;
    map_color_planes(source, |channel| {
        let reference_hist = Histogram::from_channel(reference.index_axis(Axis(2), c));
        c += 1;
        let map = matching_map(&Histogram::from_channel(channel), &reference_hist);
        Ok(map.apply(channel))
    })
}
