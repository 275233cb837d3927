//! Histogram equalization by cumulative-histogram remapping.
//!
//! The input is treated as a single intensity channel: the histogram is
//! built from R, and the resulting map is applied to R, G and B alike.
//! [`histogram_equalization`] therefore requires R = G = B.

use log::debug;
use ndarray::ArrayView2;
use rayon::prelude::*;

use super::histogram::{LevelCounts, LEVELS};
use crate::buffer::{PixelBuffer, A, B, CHANNELS, G, R};
use crate::error::{FilterError, Result};

/// Raw (unnormalized) counts of an intensity plane.
pub fn intensity_counts(intensity: ArrayView2<u8>) -> LevelCounts {
    let mut counts = [0u32; LEVELS];
    for &v in intensity.iter() {
        counts[v as usize] += 1;
    }
    counts
}

/// Build the level-to-level equalization map for an intensity plane.
///
/// Returns `None` when the plane holds a single intensity: the stretch
/// denominator `total - h_min` is zero and no remapping is defined.
pub fn equalization_map(intensity: ArrayView2<u8>) -> Option<[u8; LEVELS]> {
    let mut cumulative = intensity_counts(intensity);
    let g_min = cumulative.iter().position(|&c| c > 0)?;

    for g in 1..LEVELS {
        cumulative[g] += cumulative[g - 1];
    }
    let h_min = cumulative[g_min] as f64;
    let total = intensity.len() as f64;
    let denom = total - h_min;
    if denom <= 0.0 {
        return None;
    }

    let gain = 255.0 / denom;
    let mut map = [0u8; LEVELS];
    for (g, slot) in map.iter_mut().enumerate() {
        *slot = ((cumulative[g] as f64 - h_min) * gain).round().clamp(0.0, 255.0) as u8;
    }
    Some(map)
}

/// Contrast-stretch a grayscale image.
///
/// Alpha is copied unchanged. A single-intensity image comes back as an
/// unmodified copy.
pub fn histogram_equalization(image: &PixelBuffer) -> Result<PixelBuffer> {
    if let Some((x, y)) = image.first_non_gray() {
        return Err(FilterError::NotGrayscale { x, y });
    }

    let plane = image.red_plane();
    let Some(map) = equalization_map(plane.view()) else {
        debug!("histogram_equalization: single intensity image, returning copy");
        return Ok(image.clone());
    };

    let mut out = PixelBuffer::new(image.width(), image.height());
    out.as_raw_mut()
        .par_chunks_exact_mut(CHANNELS)
        .zip(image.as_raw().par_chunks_exact(CHANNELS))
        .for_each(|(dst, src)| {
            dst[R] = map[src[R] as usize];
            dst[G] = map[src[G] as usize];
            dst[B] = map[src[B] as usize];
            dst[A] = src[A];
        });
    Ok(out)
}
