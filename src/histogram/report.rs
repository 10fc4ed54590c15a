//! Plain-text walkthrough of a global equalization.

use std::fmt;

use ndarray::ArrayView2;

use super::{equalization_map, Cdf, Histogram, LevelMap};

/// Levels shown in the per-level tables.
const SAMPLE_LEVELS: [u8; 6] = [0, 50, 100, 150, 200, 255];

/// Maximum number of occupied output levels listed in step 4.
const MAX_OUTPUT_ROWS: usize = 10;

/// Intermediate results of equalizing one channel.
#[derive(Clone, Debug)]
pub struct EqualizationReport {
    pub label: Option<String>,
    pub before: Histogram,
    pub cdf: Cdf,
    pub map: LevelMap,
    pub after: Histogram,
}

impl EqualizationReport {
    pub fn new(channel: ArrayView2<u8>, label: Option<&str>) -> Self {
        let before = Histogram::from_channel(channel);
        let cdf = before.cdf();
        let map = equalization_map(&before);
        let after = before.remapped(&map);
        EqualizationReport {
            label: label.map(str::to_string),
            before,
            cdf,
            map,
            after,
        }
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str, suffix: &str) -> fmt::Result {
    let rule = "=".repeat(60);
    writeln!(f, "{}", rule)?;
    writeln!(f, "{}{}", title, suffix)?;
    writeln!(f, "{}", rule)
}

impl fmt::Display for EqualizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match &self.label {
            Some(label) => format!(" - channel {}", label),
            None => String::new(),
        };
        let dashes = "-".repeat(40);

        heading(f, "STEP 1: pixel count nk per level rk", &suffix)?;
        writeln!(f, "level (rk) | count (nk)")?;
        writeln!(f, "{}", dashes)?;
        for rk in SAMPLE_LEVELS {
            writeln!(
                f,
                "   {:3}     | {:8}",
                rk,
                self.before.counts()[rk as usize]
            )?;
        }
        writeln!(f, "...\n")?;

        heading(f, "STEP 2: cumulative distribution (CDF)", &suffix)?;
        writeln!(f, "level (rk) | CDF(rk)")?;
        writeln!(f, "{}", dashes)?;
        for rk in SAMPLE_LEVELS {
            writeln!(f, "   {:3}     | {:.6}", rk, self.cdf.at(rk))?;
        }
        writeln!(f, "...\n")?;

        heading(f, "STEP 3: output levels sk", &suffix)?;
        writeln!(f, "old level (rk) | new level (sk)")?;
        writeln!(f, "{}", dashes)?;
        for rk in SAMPLE_LEVELS {
            writeln!(f, "     {:3}        |      {:3}", rk, self.map.get(rk))?;
        }
        writeln!(f, "...\n")?;

        heading(f, "STEP 4: pixel count per output level sk", &suffix)?;
        writeln!(f, "level (sk) | count (nk_new)")?;
        writeln!(f, "{}", dashes)?;
        let occupied: Vec<usize> = (0..256).filter(|&s| self.after.counts()[s] > 0).collect();
        for &s in occupied.iter().take(MAX_OUTPUT_ROWS) {
            writeln!(f, "   {:3}     | {:8}", s, self.after.counts()[s])?;
        }
        if occupied.len() > MAX_OUTPUT_ROWS {
            writeln!(f, "...")?;
        }
        writeln!(f)?;

        heading(f, "SUMMARY", &suffix)?;
        writeln!(f, "total pixels: {}", self.before.total())?;
        writeln!(f, "levels used (before): {}", self.before.levels_used())?;
        write!(f, "levels used (after): {}", self.after.levels_used())
    }
}

/// Render a channel as a space-separated matrix with a title line.
pub fn format_matrix(channel: ArrayView2<u8>, label: Option<&str>) -> String {
    let (height, width) = channel.dim();
    let suffix = label
        .map(|l| format!(" - channel {}", l))
        .unwrap_or_default();
    let mut out = format!(
        "Image matrix I ({}x{}){}:\n{}\n",
        height,
        width,
        suffix,
        "=".repeat(50)
    );
    for row in channel.rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}
