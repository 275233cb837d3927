//! 256-bin histograms normalized to their mode.
//!
//! Bins are scaled by the largest raw count, not the sample total, so the
//! most frequent level always reads 1.0. This is a relative-to-mode chart,
//! not a probability density.

use log::debug;

/// Number of intensity levels.
pub const LEVELS: usize = 256;

/// Raw per-level counts.
pub type LevelCounts = [u32; LEVELS];

/// Normalized 256-bin histogram, every bin in [0, 1].
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    bins: [f32; LEVELS],
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram { bins: [0.0; LEVELS] }
    }
}

impl Histogram {
    /// Normalize raw counts by the maximum count.
    ///
    /// All-zero counts yield an all-zero histogram.
    pub fn from_counts(counts: &LevelCounts) -> Self {
        let max = counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            debug!("Histogram::from_counts: no samples, returning empty histogram");
            return Histogram::default();
        }

        let mut bins = [0.0f32; LEVELS];
        for (bin, &count) in bins.iter_mut().zip(counts.iter()) {
            *bin = (count as f64 / max as f64) as f32;
        }
        Histogram { bins }
    }

    /// Bucket float samples expected in [0, 1].
    ///
    /// Each sample lands in `round(255 * clamp(v, 0, 1))`.
    pub fn from_samples(samples: &[f32]) -> Self {
        let mut counts = [0u32; LEVELS];
        for &v in samples {
            counts[sample_level(v) as usize] += 1;
        }
        Self::from_counts(&counts)
    }

    #[inline]
    pub fn bins(&self) -> &[f32; LEVELS] {
        &self.bins
    }

    #[inline]
    pub fn get(&self, level: u8) -> f32 {
        self.bins[level as usize]
    }

    /// Lowest level holding the value 1.0, if any sample was counted.
    pub fn mode(&self) -> Option<u8> {
        self.bins.iter().position(|&b| b == 1.0).map(|i| i as u8)
    }

    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(|&b| b == 0.0)
    }
}

/// Map a float sample to its byte bin. NaN falls into bin 0.
#[inline]
pub fn sample_level(v: f32) -> u8 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (255.0 * v).round() as u8
}

/// Convenience wrapper over [`Histogram::from_samples`].
pub fn histogram_from_samples(samples: &[f32]) -> Histogram {
    Histogram::from_samples(samples)
}
