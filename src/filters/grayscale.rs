//! Grayscale conversion with histogram accumulation in one pass.
//!
//! Gray level is the unweighted channel average `round((R + G + B) / 3)`,
//! which never exceeds 255.
//!
//! Callers choose which outputs they want through an [`OutputSink`]: a
//! gray image, a normalized histogram of the gray levels, both, or none.

use log::debug;
use rayon::prelude::*;

use super::histogram::{Histogram, LevelCounts, LEVELS};
use crate::buffer::{PixelBuffer, B, CHANNELS, G, R};

/// Average of the R, G and B bytes of one pixel, rounded.
#[inline]
pub fn to_gray_average(pixel: &[u8]) -> u8 {
    let sum = pixel[R] as u32 + pixel[G] as u32 + pixel[B] as u32;
    (sum as f32 / 3.0).round() as u8
}

/// Caller-provided destinations for [`generate_gray_image_and_histogram`].
///
/// A supplied image is re-initialized to the input's dimensions (opaque
/// white) before gray levels are written into its R, G and B channels.
#[derive(Debug, Default)]
pub struct OutputSink<'a> {
    image: Option<&'a mut PixelBuffer>,
    histogram: Option<&'a mut Histogram>,
}

impl<'a> OutputSink<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, image: &'a mut PixelBuffer) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_histogram(mut self, histogram: &'a mut Histogram) -> Self {
        self.histogram = Some(histogram);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.histogram.is_none()
    }
}

/// Convert `image` to gray levels and fill whichever outputs `sink` holds.
pub fn generate_gray_image_and_histogram(image: &PixelBuffer, sink: OutputSink<'_>) {
    if sink.is_empty() {
        debug!("generate_gray_image_and_histogram: no outputs requested");
        return;
    }

    let levels: Vec<u8> = image
        .as_raw()
        .par_chunks_exact(CHANNELS)
        .map(to_gray_average)
        .collect();

    if let Some(out) = sink.image {
        *out = PixelBuffer::new(image.width(), image.height());
        for (px, &gray) in out.as_raw_mut().chunks_exact_mut(CHANNELS).zip(levels.iter()) {
            px[R] = gray;
            px[G] = gray;
            px[B] = gray;
        }
    }

    if let Some(hist) = sink.histogram {
        let mut counts: LevelCounts = [0; LEVELS];
        for &gray in &levels {
            counts[gray as usize] += 1;
        }
        *hist = Histogram::from_counts(&counts);
    }
}

/// Gray copy of `image`; alpha is reset to opaque.
pub fn grayscale(image: &PixelBuffer) -> PixelBuffer {
    let mut out = PixelBuffer::new(image.width(), image.height());
    generate_gray_image_and_histogram(image, OutputSink::new().with_image(&mut out));
    out
}

/// Normalized histogram of the gray levels of `image`.
pub fn gray_histogram(image: &PixelBuffer) -> Histogram {
    let mut hist = Histogram::default();
    generate_gray_image_and_histogram(image, OutputSink::new().with_histogram(&mut hist));
    hist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> PixelBuffer {
        let data = vec![
            255, 0, 0, 10, //
            10, 20, 31, 20, //
            100, 100, 100, 30, //
            1, 1, 2, 40, //
            10, 20, 31, 50, //
            0, 0, 0, 60,
        ];
        PixelBuffer::from_raw(3, 2, data).unwrap()
    }

    #[test]
    fn test_gray_average_rounds() {
        assert_eq!(to_gray_average(&[255, 0, 0, 0]), 85);
        // 61 / 3 = 20.33
        assert_eq!(to_gray_average(&[10, 20, 31, 0]), 20);
        // 4 / 3 = 1.33, 5 / 3 = 1.67
        assert_eq!(to_gray_average(&[1, 1, 2, 0]), 1);
        assert_eq!(to_gray_average(&[1, 2, 2, 0]), 2);
        assert_eq!(to_gray_average(&[255, 255, 255, 0]), 255);
    }

    #[test]
    fn test_gray_image_has_equal_channels() {
        let gray = grayscale(&sample_image());
        assert!(gray.is_grayscale());
        assert_eq!(gray.pixel(0, 0), &[85, 85, 85, 255]);
        assert_eq!(gray.pixel(2, 0), &[100, 100, 100, 255]);
    }

    #[test]
    fn test_histogram_mode_matches_most_frequent_level() {
        let hist = gray_histogram(&sample_image());
        // level 20 appears twice, everything else once
        assert_eq!(hist.mode(), Some(20));
        assert_eq!(hist.get(85), 0.5);
        assert_eq!(hist.get(0), 0.5);
        assert_eq!(hist.get(7), 0.0);
    }

    #[test]
    fn test_sink_image_is_reinitialized() {
        let mut out = PixelBuffer::new(1, 1);
        let mut hist = Histogram::default();
        generate_gray_image_and_histogram(
            &sample_image(),
            OutputSink::new().with_image(&mut out).with_histogram(&mut hist),
        );
        assert_eq!((out.width(), out.height()), (3, 2));
        assert_eq!(hist.mode(), Some(20));
    }

    #[test]
    fn test_empty_sink_is_noop() {
        let sink = OutputSink::new();
        assert!(sink.is_empty());
        generate_gray_image_and_histogram(&sample_image(), sink);
    }
}
