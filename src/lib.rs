//! Pixel Lab
//!
//! Classic image processing operations on RGBA8 rasters: gray histograms and
//! their bar charts, Gaussian noise, multi-level Haar wavelet visualization,
//! histogram equalization and square-kernel convolution with selectable edge
//! handling.
//!
//! ## Image Format
//! Every operation works on a [`PixelBuffer`]: width x height pixels, four
//! bytes per pixel in (R, G, B, A) order, row-major with no padding. Alpha is
//! never processed; it is either copied through or reset to opaque.
//!
//! ## Layout
//! - [`filters`]: the algorithms, each reading a borrowed buffer and
//!   returning a new one
//! - [`pipeline`]: operations as a user runs them (grayscale first, resize
//!   to powers of two, chart every histogram)
//! - [`io`] and [`config`]: file formats and the JSON run config used by the
//!   `pixel_lab` binary
//!
//! Python bindings (feature `python`) and WebAssembly exports (feature
//! `wasm`) wrap the same functions.

pub mod buffer;
pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::PixelBuffer;
pub use error::{FilterError, Result};
pub use filters::{EdgeHandling, Histogram, Kernel, KernelTemplate, NoiseRng};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::PixelBuffer;
    use crate::error::FilterError;
    use crate::filters::convolution::{EdgeHandling, Kernel};
    use crate::filters::noise::{self as noise_mod, NoiseRng};
    use crate::pipeline;

    fn value_error(err: FilterError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn to_buffer(image: &PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        PixelBuffer::from_array(image.as_array()).map_err(value_error)
    }

    // ========================================================================
    // Grayscale and Histograms
    // ========================================================================

    /// Gray image (unweighted RGB mean), its 256-bin histogram normalized to
    /// the mode, and the 300x300 bar chart.
    #[pyfunction]
    pub fn gray_histogram<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, Bound<'py, PyArray1<f32>>, Bound<'py, PyArray3<u8>>)> {
        let result = pipeline::gray_histogram(&to_buffer(&image)?);
        Ok((
            result.gray.to_array().into_pyarray(py),
            result.histogram.bins().to_vec().into_pyarray(py),
            result.chart.to_array().into_pyarray(py),
        ))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    /// `count` normally distributed samples with standard deviation `sigma`.
    #[pyfunction]
    #[pyo3(signature = (count, sigma, seed=0))]
    pub fn gaussian_noise<'py>(
        py: Python<'py>,
        count: usize,
        sigma: f32,
        seed: u64,
    ) -> Bound<'py, PyArray1<f32>> {
        let mut rng = NoiseRng::new(seed);
        noise_mod::gaussian_noise(count, sigma, &mut rng).into_pyarray(py)
    }

    /// Noisy image and the noise histogram chart. `sigma` is in 0-255 units.
    #[pyfunction]
    #[pyo3(signature = (image, sigma=20.0, seed=0))]
    pub fn add_gaussian_noise<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        sigma: f32,
        seed: u64,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, Bound<'py, PyArray3<u8>>)> {
        let mut rng = NoiseRng::new(seed);
        let result = pipeline::add_gaussian_noise(&to_buffer(&image)?, sigma, &mut rng);
        Ok((
            result.image.to_array().into_pyarray(py),
            result.chart.to_array().into_pyarray(py),
        ))
    }

    // ========================================================================
    // Geometry and Wavelets
    // ========================================================================

    #[pyfunction]
    pub fn resize<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        width: usize,
        height: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = pipeline::resize(&to_buffer(&image)?, width, height).map_err(value_error)?;
        Ok(result.to_array().into_pyarray(py))
    }

    /// Grayscale, resize to power-of-two dimensions and run `level` Haar passes.
    #[pyfunction]
    #[pyo3(signature = (image, level=1, scale=1.0))]
    pub fn haar_wavelet<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        level: i32,
        scale: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = pipeline::haar_wavelet(&to_buffer(&image)?, level, scale).map_err(value_error)?;
        Ok(result.to_array().into_pyarray(py))
    }

    // ========================================================================
    // Equalization and Convolution
    // ========================================================================

    /// Grayscale the input and equalize it.
    #[pyfunction]
    pub fn histogram_equalization<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let result = pipeline::equalize(&to_buffer(&image)?).map_err(value_error)?;
        Ok(result.output.to_array().into_pyarray(py))
    }

    /// Convolve with a square odd-sized kernel; `edge` is "extend", "wrap"
    /// or "mirror".
    #[pyfunction]
    #[pyo3(signature = (image, kernel, edge="extend"))]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        kernel: PyReadonlyArray2<'py, f32>,
        edge: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let edge: EdgeHandling = edge.parse().map_err(PyValueError::new_err)?;
        let kernel = Kernel::from_array(kernel.as_array().to_owned()).map_err(value_error)?;
        let result = pipeline::convolve(&to_buffer(&image)?, &kernel, edge).map_err(value_error)?;
        Ok(result.to_array().into_pyarray(py))
    }

    #[pymodule]
    pub fn pixel_lab(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(gray_histogram, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_noise, m)?)?;
        m.add_function(wrap_pyfunction!(add_gaussian_noise, m)?)?;
        m.add_function(wrap_pyfunction!(resize, m)?)?;
        m.add_function(wrap_pyfunction!(haar_wavelet, m)?)?;
        m.add_function(wrap_pyfunction!(histogram_equalization, m)?)?;
        m.add_function(wrap_pyfunction!(convolve, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixel_lab;
