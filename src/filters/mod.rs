//! Pixel-level image processing algorithms.
//!
//! ## Image Format
//!
//! Every filter reads a [`PixelBuffer`](crate::buffer::PixelBuffer): RGBA8,
//! row-major, channel order (R, G, B, A). Inputs are borrowed read-only and a
//! new buffer (or histogram) is returned.
//!
//! ## Filter Categories
//!
//! - **Histogram**: mode-normalized 256-bin histograms and their bar chart
//! - **Grayscale**: unweighted RGB average with histogram accumulation
//! - **Noise**: seedable Box-Muller Gaussian noise fields
//! - **Wavelet**: multi-level Haar decomposition (power-of-two sizes)
//! - **Equalize**: cumulative-histogram contrast stretch
//! - **Convolution**: square kernels with extend / wrap / mirror borders
//!
//! Alpha is never processed: it is copied through (convolution,
//! equalization, wavelet) or reset to opaque (grayscale).

pub mod histogram;
pub mod render;
pub mod grayscale;
pub mod noise;
pub mod wavelet;
pub mod equalize;
pub mod convolution;

pub use convolution::{image_convolution, EdgeHandling, Kernel, KernelTemplate};
pub use equalize::histogram_equalization;
pub use grayscale::{generate_gray_image_and_histogram, OutputSink};
pub use histogram::Histogram;
pub use noise::{generate_gaussian_noise, NoiseRng};
pub use render::render_histogram;
pub use wavelet::haar_wavelet_transform;
