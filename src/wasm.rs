//! WebAssembly exports for Pixel Lab.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images travel
//! as flat RGBA byte arrays (length = width * height * 4); invalid input is
//! raised as a JavaScript `Error`.

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::FilterError;
use crate::filters::convolution::{EdgeHandling, Kernel};
use crate::filters::noise::NoiseRng;
use crate::pipeline;

fn js_error(err: FilterError) -> JsError {
    JsError::new(&err.to_string())
}

fn to_buffer(data: &[u8], width: usize, height: usize) -> Result<PixelBuffer, JsError> {
    PixelBuffer::from_raw(width, height, data.to_vec()).map_err(js_error)
}

// ============================================================================
// Grayscale and Histograms
// ============================================================================

/// Convert to gray (unweighted RGB mean).
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of RGBA bytes with R=G=B=gray and opaque alpha
#[wasm_bindgen]
pub fn grayscale_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let image = to_buffer(data, width, height)?;
    Ok(pipeline::gray_histogram(&image).gray.into_raw())
}

/// Render the gray histogram of an image as a 300x300 RGBA chart.
#[wasm_bindgen]
pub fn gray_histogram_chart_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let image = to_buffer(data, width, height)?;
    Ok(pipeline::gray_histogram(&image).chart.into_raw())
}

// ============================================================================
// Noise
// ============================================================================

/// Add Gaussian noise with standard deviation `sigma` (0-255 units).
#[wasm_bindgen]
pub fn add_gaussian_noise_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    sigma: f32,
    seed: u64,
) -> Result<Vec<u8>, JsError> {
    let image = to_buffer(data, width, height)?;
    let mut rng = NoiseRng::new(seed);
    Ok(pipeline::add_gaussian_noise(&image, sigma, &mut rng).image.into_raw())
}

// ============================================================================
// Wavelets, Equalization, Convolution
// ============================================================================

/// Haar wavelet visualization.
///
/// # Returns
/// Flat RGBA bytes at the nearest power-of-two dimensions of the input
#[wasm_bindgen]
pub fn haar_wavelet_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    level: i32,
    scale: f32,
) -> Result<Vec<u8>, JsError> {
    let image = to_buffer(data, width, height)?;
    let result = pipeline::haar_wavelet(&image, level, scale).map_err(js_error)?;
    Ok(result.into_raw())
}

#[wasm_bindgen]
pub fn histogram_equalization_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let image = to_buffer(data, width, height)?;
    let result = pipeline::equalize(&image).map_err(js_error)?;
    Ok(result.output.into_raw())
}

/// Convolve with a square kernel.
///
/// # Arguments
/// * `kernel` - Row-major weights (length = kernel_size * kernel_size)
/// * `edge` - "extend", "wrap" or "mirror"
#[wasm_bindgen]
pub fn convolve_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    kernel: &[f32],
    kernel_size: usize,
    edge: &str,
) -> Result<Vec<u8>, JsError> {
    let image = to_buffer(data, width, height)?;
    let edge: EdgeHandling = edge.parse().map_err(|e: String| JsError::new(&e))?;
    let kernel = Kernel::new(kernel_size, kernel.to_vec()).map_err(js_error)?;
    let result = pipeline::convolve(&image, &kernel, edge).map_err(js_error)?;
    Ok(result.into_raw())
}
