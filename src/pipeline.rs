//! End-to-end operations built from the filters.
//!
//! Each function here corresponds to one user-facing operation and returns
//! every image that operation produces (results plus histogram charts), so a
//! viewer only has to display them.

use image::imageops::{self, FilterType};
use log::debug;

use crate::buffer::{PixelBuffer, A, B, CHANNELS, G, R};
use crate::error::{FilterError, Result};
use crate::filters::convolution::{image_convolution, EdgeHandling, Kernel};
use crate::filters::equalize::histogram_equalization;
use crate::filters::grayscale::{generate_gray_image_and_histogram, OutputSink};
use crate::filters::histogram::{histogram_from_samples, Histogram};
use crate::filters::noise::{gaussian_noise, NoiseRng};
use crate::filters::render::render_histogram;
use crate::filters::wavelet::haar_wavelet_transform;
use crate::io::{from_rgba_image, to_rgba_image};

/// Gray image, its histogram and the rendered chart.
#[derive(Clone, Debug)]
pub struct GrayHistogram {
    pub gray: PixelBuffer,
    pub histogram: Histogram,
    pub chart: PixelBuffer,
}

/// Noisy image plus the distribution of the noise that was added.
#[derive(Clone, Debug)]
pub struct NoisyImage {
    pub image: PixelBuffer,
    /// One sample per pixel, std `sigma / 255`.
    pub noise: Vec<f32>,
    /// Histogram of `noise + 0.5`.
    pub histogram: Histogram,
    pub chart: PixelBuffer,
}

/// Before and after views of an equalization.
#[derive(Clone, Debug)]
pub struct Equalization {
    pub input: PixelBuffer,
    pub input_histogram: Histogram,
    pub input_chart: PixelBuffer,
    pub output: PixelBuffer,
    pub output_histogram: Histogram,
    pub output_chart: PixelBuffer,
}

fn gray_with_histogram(image: &PixelBuffer) -> (PixelBuffer, Histogram) {
    let mut gray = PixelBuffer::new(image.width(), image.height());
    let mut histogram = Histogram::default();
    generate_gray_image_and_histogram(
        image,
        OutputSink::new().with_image(&mut gray).with_histogram(&mut histogram),
    );
    (gray, histogram)
}

pub fn gray_histogram(image: &PixelBuffer) -> GrayHistogram {
    let (gray, histogram) = gray_with_histogram(image);
    let chart = render_histogram(&histogram);
    GrayHistogram {
        gray,
        histogram,
        chart,
    }
}

/// Add Gaussian noise with standard deviation `sigma` in 0-255 units.
///
/// The same sample is added to R, G and B of a pixel; alpha is kept.
pub fn add_gaussian_noise(image: &PixelBuffer, sigma: f32, rng: &mut NoiseRng) -> NoisyImage {
    let sigma_normalized = sigma / 255.0;
    let noise = gaussian_noise(image.len(), sigma_normalized, rng);

    let mut out = PixelBuffer::new(image.width(), image.height());
    for ((dst, src), &n) in out
        .as_raw_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(image.as_raw().chunks_exact(CHANNELS))
        .zip(noise.iter())
    {
        let offset = 255.0 * n;
        for c in [R, G, B] {
            dst[c] = (src[c] as f32 + offset).clamp(0.0, 255.0) as u8;
        }
        dst[A] = src[A];
    }

    let shifted: Vec<f32> = noise.iter().map(|v| v + 0.5).collect();
    let histogram = histogram_from_samples(&shifted);
    let chart = render_histogram(&histogram);
    debug!(
        "add_gaussian_noise: sigma={sigma} over {} pixels",
        image.len()
    );

    NoisyImage {
        image: out,
        noise,
        histogram,
        chart,
    }
}

/// Resample to `width` x `height` with a Catmull-Rom filter.
pub fn resize(image: &PixelBuffer, width: usize, height: usize) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimensions { width, height });
    }
    if (width, height) == (image.width(), image.height()) {
        return Ok(image.clone());
    }
    let src = to_rgba_image(image)?;
    let resized = imageops::resize(&src, width as u32, height as u32, FilterType::CatmullRom);
    from_rgba_image(resized)
}

/// Power of two closest to `n`; ties go up, `n <= 1` gives 1.
pub fn nearest_power_of_two(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    if n.is_power_of_two() {
        return n;
    }
    let lower = 1usize << (usize::BITS - 1 - n.leading_zeros());
    let upper = lower << 1;
    if n - lower < upper - n {
        lower
    } else {
        upper
    }
}

/// Grayscale, resize to power-of-two dimensions, then decompose.
pub fn haar_wavelet(image: &PixelBuffer, level: i32, scale: f32) -> Result<PixelBuffer> {
    if level < 0 {
        return Err(FilterError::NegativeLevel { level });
    }
    let (gray, _) = gray_with_histogram(image);
    let target_w = nearest_power_of_two(gray.width());
    let target_h = nearest_power_of_two(gray.height());
    debug!(
        "haar_wavelet: {}x{} -> {target_w}x{target_h}, level={level}, scale={scale}",
        gray.width(),
        gray.height()
    );
    let resized = resize(&gray, target_w, target_h)?;
    haar_wavelet_transform(&resized, level, scale)
}

/// Grayscale the input, equalize it and chart both histograms.
pub fn equalize(image: &PixelBuffer) -> Result<Equalization> {
    let (input, input_histogram) = gray_with_histogram(image);
    let input_chart = render_histogram(&input_histogram);

    let output = histogram_equalization(&input)?;
    let mut output_histogram = Histogram::default();
    generate_gray_image_and_histogram(&output, OutputSink::new().with_histogram(&mut output_histogram));
    let output_chart = render_histogram(&output_histogram);

    Ok(Equalization {
        input,
        input_histogram,
        input_chart,
        output,
        output_histogram,
        output_chart,
    })
}

pub fn convolve(image: &PixelBuffer, kernel: &Kernel, edge: EdgeHandling) -> Result<PixelBuffer> {
    debug!("convolve: {}x{} kernel, edge={edge}", kernel.size(), kernel.size());
    image_convolution(image, kernel, edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> PixelBuffer {
        let mut img = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 30 } else { 220 };
                img.pixel_mut(x, y).copy_from_slice(&[v, v, 0, 255]);
            }
        }
        img
    }

    #[test]
    fn test_nearest_power_of_two() {
        assert_eq!(nearest_power_of_two(0), 1);
        assert_eq!(nearest_power_of_two(1), 1);
        assert_eq!(nearest_power_of_two(3), 4);
        assert_eq!(nearest_power_of_two(5), 4);
        assert_eq!(nearest_power_of_two(6), 8);
        assert_eq!(nearest_power_of_two(12), 16);
        assert_eq!(nearest_power_of_two(100), 128);
        assert_eq!(nearest_power_of_two(64), 64);
    }

    #[test]
    fn test_gray_histogram_outputs() {
        let result = gray_histogram(&checker(4, 4));
        assert!(result.gray.is_grayscale());
        assert_eq!((result.chart.width(), result.chart.height()), (300, 300));
        // 20 and 147 split evenly
        assert_eq!(result.histogram.get(20), 1.0);
        assert_eq!(result.histogram.get(147), 1.0);
    }

    #[test]
    fn test_zero_sigma_noise_is_identity() {
        let img = checker(3, 5);
        let result = add_gaussian_noise(&img, 0.0, &mut NoiseRng::new(1));
        assert_eq!(result.image, img);
        assert_eq!(result.noise.len(), 15);
        // All shifted samples sit at 0.5 -> bin 128.
        assert_eq!(result.histogram.mode(), Some(128));
    }

    #[test]
    fn test_noise_keeps_alpha_and_is_seeded() {
        let mut img = checker(4, 4);
        img.pixel_mut(0, 0)[A] = 17;
        let a = add_gaussian_noise(&img, 25.0, &mut NoiseRng::new(5));
        let b = add_gaussian_noise(&img, 25.0, &mut NoiseRng::new(5));
        assert_eq!(a.image, b.image);
        assert_eq!(a.image.pixel(0, 0)[A], 17);
        assert_ne!(a.image, img);
    }

    #[test]
    fn test_noise_field_returned_unmodified() {
        let img = checker(64, 64);
        let sigma = 20.0f32;
        let result = add_gaussian_noise(&img, sigma, &mut NoiseRng::new(5));
        let expected = gaussian_noise(64 * 64, sigma / 255.0, &mut NoiseRng::new(5));
        let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&result.noise), bits(&expected));
    }

    #[test]
    fn test_resize_dimensions() {
        let img = checker(5, 3);
        let out = resize(&img, 8, 4).unwrap();
        assert_eq!((out.width(), out.height()), (8, 4));
        assert!(matches!(
            resize(&img, 0, 4),
            Err(FilterError::InvalidDimensions { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_haar_pipeline_pads_to_power_of_two() {
        let out = haar_wavelet(&checker(6, 3), 1, 1.0).unwrap();
        assert_eq!((out.width(), out.height()), (8, 4));
        assert!(out.is_grayscale());
        assert!(matches!(
            haar_wavelet(&checker(2, 2), -2, 1.0),
            Err(FilterError::NegativeLevel { level: -2 })
        ));
    }

    #[test]
    fn test_equalize_pipeline() {
        let result = equalize(&checker(4, 4)).unwrap();
        assert!(result.input.is_grayscale());
        // two levels -> 0 and 255
        let levels: Vec<u8> = result.output.as_raw().chunks_exact(4).map(|px| px[R]).collect();
        assert!(levels.iter().all(|&v| v == 0 || v == 255));
        assert_eq!(result.output_histogram.get(0), 1.0);
        assert_eq!(result.output_histogram.get(255), 1.0);
    }
}
