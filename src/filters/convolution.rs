//! Square-kernel 2D convolution with selectable edge handling.
//!
//! The source is first copied into a padded buffer with a margin of
//! `size - 1` pixels on every side; out-of-range source coordinates are
//! resolved by the chosen [`EdgeHandling`]. Only the inner `size / 2` of that
//! margin is ever read.
//!
//! Kernel index `(half - t, half - s)` pairs with pixel offset `(s, t)` from
//! the target, i.e. the kernel is flipped. Asymmetric templates such as
//! emboss depend on this orientation.
//!
//! R, G and B are convolved independently; alpha is copied from the source.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rayon::prelude::*;
use serde::Deserialize;

use crate::buffer::{PixelBuffer, A, B, CHANNELS, G, R};
use crate::error::{FilterError, Result};

// ============================================================================
// Edge handling
// ============================================================================

/// How taps outside the image are resolved.
///
/// Names are parsed case-insensitively, through both `FromStr` and serde.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum EdgeHandling {
    /// Clamp to the nearest edge pixel.
    #[default]
    Extend,
    /// Tile the image periodically.
    Wrap,
    /// Reflect across the border, edge pixel repeated: (c b a | a b c | c b a).
    Mirror,
}

impl EdgeHandling {
    /// Map a possibly out-of-range coordinate into `[0, dim)`.
    #[inline]
    pub fn resolve(self, i: isize, dim: usize) -> usize {
        let d = dim as isize;
        if (0..d).contains(&i) {
            return i as usize;
        }
        match self {
            EdgeHandling::Extend => i.clamp(0, d - 1) as usize,
            EdgeHandling::Wrap => i.rem_euclid(d) as usize,
            EdgeHandling::Mirror => {
                // Period 2 * dim: -x - 1 below zero, 2 * dim - x - 1 past the end.
                let m = i.rem_euclid(2 * d);
                if m >= d {
                    (2 * d - m - 1) as usize
                } else {
                    m as usize
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EdgeHandling::Extend => "extend",
            EdgeHandling::Wrap => "wrap",
            EdgeHandling::Mirror => "mirror",
        }
    }
}

impl fmt::Display for EdgeHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeHandling {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "extend" => Ok(EdgeHandling::Extend),
            "wrap" => Ok(EdgeHandling::Wrap),
            "mirror" => Ok(EdgeHandling::Mirror),
            other => Err(format!("unknown edge handling '{other}' (extend, wrap, mirror)")),
        }
    }
}

impl TryFrom<String> for EdgeHandling {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

// ============================================================================
// Kernels
// ============================================================================

/// Built-in 3x3 kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum KernelTemplate {
    #[serde(rename = "identity")]
    Identity,
    #[serde(rename = "edge_detection_4")]
    EdgeDetection4,
    #[serde(rename = "edge_detection_8")]
    EdgeDetection8,
    #[serde(rename = "sharpen")]
    Sharpen,
    #[serde(rename = "gaussian_blur_3")]
    GaussianBlur3,
    #[serde(rename = "emboss")]
    Emboss,
}

impl KernelTemplate {
    pub const ALL: [KernelTemplate; 6] = [
        KernelTemplate::Identity,
        KernelTemplate::EdgeDetection4,
        KernelTemplate::EdgeDetection8,
        KernelTemplate::Sharpen,
        KernelTemplate::GaussianBlur3,
        KernelTemplate::Emboss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KernelTemplate::Identity => "identity",
            KernelTemplate::EdgeDetection4 => "edge_detection_4",
            KernelTemplate::EdgeDetection8 => "edge_detection_8",
            KernelTemplate::Sharpen => "sharpen",
            KernelTemplate::GaussianBlur3 => "gaussian_blur_3",
            KernelTemplate::Emboss => "emboss",
        }
    }

    /// Row-major weights.
    pub fn weights(self) -> [f32; 9] {
        match self {
            KernelTemplate::Identity => [
                0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0,
            ],
            KernelTemplate::EdgeDetection4 => [
                0.0, -1.0, 0.0, //
                -1.0, 4.0, -1.0, //
                0.0, -1.0, 0.0,
            ],
            KernelTemplate::EdgeDetection8 => [
                -1.0, -1.0, -1.0, //
                -1.0, 8.0, -1.0, //
                -1.0, -1.0, -1.0,
            ],
            KernelTemplate::Sharpen => [
                0.0, -1.0, 0.0, //
                -1.0, 5.0, -1.0, //
                0.0, -1.0, 0.0,
            ],
            KernelTemplate::GaussianBlur3 => [
                0.0625, 0.125, 0.0625, //
                0.125, 0.25, 0.125, //
                0.0625, 0.125, 0.0625,
            ],
            KernelTemplate::Emboss => [
                -2.0, -1.0, 0.0, //
                -1.0, 1.0, 1.0, //
                0.0, 1.0, 2.0,
            ],
        }
    }
}

impl FromStr for KernelTemplate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        KernelTemplate::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown kernel template '{s}'"))
    }
}

/// Odd-sized square kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Array2<f32>,
}

fn check_size(size: usize) -> Result<()> {
    if size == 0 || size % 2 == 0 {
        return Err(FilterError::InvalidKernelSize { size });
    }
    Ok(())
}

impl Kernel {
    /// Build from `size * size` row-major weights.
    pub fn new(size: usize, weights: Vec<f32>) -> Result<Self> {
        check_size(size)?;
        let expected = size * size;
        let actual = weights.len();
        let weights = Array2::from_shape_vec((size, size), weights)
            .map_err(|_| FilterError::KernelLength { expected, actual })?;
        Ok(Kernel { weights })
    }

    pub fn from_array(weights: Array2<f32>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        check_size(rows)?;
        if rows != cols {
            return Err(FilterError::KernelLength {
                expected: rows * rows,
                actual: rows * cols,
            });
        }
        Ok(Kernel { weights })
    }

    /// Kernel with a single 1 at the center.
    pub fn identity(size: usize) -> Result<Self> {
        check_size(size)?;
        let mut weights = Array2::zeros((size, size));
        weights[[size / 2, size / 2]] = 1.0;
        Ok(Kernel { weights })
    }

    pub fn template(template: KernelTemplate) -> Self {
        Kernel {
            weights: Array2::from_shape_fn((3, 3), |(y, x)| template.weights()[y * 3 + x]),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    #[inline]
    pub fn half(&self) -> usize {
        self.size() / 2
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Row-major weights as a flat vector.
    pub fn to_vec(&self) -> Vec<f32> {
        self.weights.iter().copied().collect()
    }

    /// Re-size to `new_size`, keeping existing weights centered.
    ///
    /// Growing pads with zeros; shrinking crops to the center.
    pub fn resized(&self, new_size: usize) -> Result<Self> {
        check_size(new_size)?;
        let old = self.size() as isize;
        let offset = (new_size as isize - old) / 2;
        let weights = Array2::from_shape_fn((new_size, new_size), |(y, x)| {
            let oy = y as isize - offset;
            let ox = x as isize - offset;
            if (0..old).contains(&oy) && (0..old).contains(&ox) {
                self.weights[[oy as usize, ox as usize]]
            } else {
                0.0
            }
        });
        Ok(Kernel { weights })
    }
}

impl From<KernelTemplate> for Kernel {
    fn from(template: KernelTemplate) -> Self {
        Kernel::template(template)
    }
}

// ============================================================================
// Convolution
// ============================================================================

/// Copy `image` into a buffer with a `margin`-pixel border resolved by `edge`.
///
/// Only R, G and B are copied; padded alpha is zero.
pub fn pad_image(image: &PixelBuffer, margin: usize, edge: EdgeHandling) -> Result<PixelBuffer> {
    let (w, h) = (image.width(), image.height());
    let pw = w + 2 * margin;
    let ph = h + 2 * margin;
    let mut padded = PixelBuffer::from_raw(pw, ph, vec![0; pw * ph * CHANNELS])?;

    for py in 0..ph {
        let sy = edge.resolve(py as isize - margin as isize, h);
        for px in 0..pw {
            let sx = edge.resolve(px as isize - margin as isize, w);
            let src = image.pixel(sx, sy);
            let dst = padded.pixel_mut(px, py);
            dst[R] = src[R];
            dst[G] = src[G];
            dst[B] = src[B];
        }
    }
    Ok(padded)
}

/// Convolve `image` with `kernel`.
pub fn image_convolution(image: &PixelBuffer, kernel: &Kernel, edge: EdgeHandling) -> Result<PixelBuffer> {
    let size = kernel.size();
    let half = kernel.half() as isize;
    let margin = size - 1;
    let padded = pad_image(image, margin, edge)?;
    let weights = kernel.weights();

    let width = image.width();
    let mut out = PixelBuffer::new(width, image.height());

    out.as_raw_mut()
        .par_chunks_exact_mut(width * CHANNELS)
        .enumerate()
        .for_each(|(y, row)| {
            let cy = (y + margin) as isize;
            for (x, dst) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let cx = (x + margin) as isize;
                let mut sum = [0.0f32; 3];
                for t in -half..=half {
                    for s in -half..=half {
                        let k = weights[[(half - t) as usize, (half - s) as usize]];
                        let src = padded.pixel((cx + s) as usize, (cy + t) as usize);
                        sum[0] += k * src[R] as f32;
                        sum[1] += k * src[G] as f32;
                        sum[2] += k * src[B] as f32;
                    }
                }
                dst[R] = sum[0].round().clamp(0.0, 255.0) as u8;
                dst[G] = sum[1].round().clamp(0.0, 255.0) as u8;
                dst[B] = sum[2].round().clamp(0.0, 255.0) as u8;
                dst[A] = image.pixel(x, y)[A];
            }
        });

    Ok(out)
}

/// Convolve with a flat row-major kernel of `size * size` weights.
pub fn convolve_with_weights(
    image: &PixelBuffer,
    size: usize,
    weights: &[f32],
    edge: EdgeHandling,
) -> Result<PixelBuffer> {
    let kernel = Kernel::new(size, weights.to_vec())?;
    image_convolution(image, &kernel, edge)
}
