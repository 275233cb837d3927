//! Bar-chart rendering of a normalized histogram.
//!
//! The chart is a fixed 300x300 image. Level `g` owns column `22 + g` of a
//! centered 256-pixel band spanning rows 22..278; above its bar top the
//! column is gray (127), from the bar top down it is black. Pixels outside
//! the band stay opaque white.

use super::histogram::{Histogram, LEVELS};
use crate::buffer::PixelBuffer;

/// Chart side length in pixels.
pub const CHART_SIZE: usize = 300;
/// Margin between chart border and the 256-pixel band.
pub const CHART_MARGIN: usize = (CHART_SIZE - LEVELS) / 2;

const BACKGROUND: u8 = 127;
const FOREGROUND: u8 = 0;

/// Row at which the bar of a bin with value `bin` starts.
#[inline]
pub fn bar_top(bin: f32) -> usize {
    // Float-to-int truncation: fuller bins start closer to the band top.
    let top = CHART_MARGIN as f32 + LEVELS as f32 * (1.0 - bin);
    (top as usize).clamp(CHART_MARGIN, CHART_MARGIN + LEVELS)
}

/// Draw `histogram` as a 300x300 bar chart.
pub fn render_histogram(histogram: &Histogram) -> PixelBuffer {
    let mut image = PixelBuffer::new(CHART_SIZE, CHART_SIZE);
    let band_end = CHART_MARGIN + LEVELS;

    for (level, &bin) in histogram.bins().iter().enumerate() {
        let x = CHART_MARGIN + level;
        let top = bar_top(bin);
        for y in CHART_MARGIN..band_end {
            let v = if y < top { BACKGROUND } else { FOREGROUND };
            let px = image.pixel_mut(x, y);
            px[0] = v;
            px[1] = v;
            px[2] = v;
        }
    }

    image
}
