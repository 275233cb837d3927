//! Error type shared by the filters, pipelines and image I/O.

use std::fmt;
use std::io;

/// Reasons an operation can refuse its input or fail to produce output.
#[derive(Debug)]
pub enum FilterError {
    /// Width or height is zero.
    EmptyImage { width: usize, height: usize },
    /// Raw pixel data does not hold exactly `4 * width * height` bytes.
    BufferLength { expected: usize, actual: usize },
    /// An ndarray image did not have 4 channels.
    ChannelCount { found: usize },
    /// Kernel size is even or zero.
    InvalidKernelSize { size: usize },
    /// Kernel weight count does not equal `size * size`.
    KernelLength { expected: usize, actual: usize },
    /// Wavelet decomposition level below zero.
    NegativeLevel { level: i32 },
    /// Wavelet input dimensions are not powers of two.
    NotPowerOfTwo { width: usize, height: usize },
    /// Pixel at (x, y) has differing R, G and B values.
    NotGrayscale { x: usize, y: usize },
    /// Resize target with a zero dimension.
    InvalidDimensions { width: usize, height: usize },
    /// File extension the encoder does not handle.
    UnsupportedFormat { extension: String },
    /// Decoding or encoding failure.
    Image(image::ImageError),
    /// Filesystem failure.
    Io(io::Error),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::EmptyImage { width, height } => {
                write!(f, "image has zero area ({width}x{height})")
            }
            FilterError::BufferLength { expected, actual } => {
                write!(f, "pixel buffer holds {actual} bytes, expected {expected}")
            }
            FilterError::ChannelCount { found } => {
                write!(f, "expected 4 channels (RGBA), found {found}")
            }
            FilterError::InvalidKernelSize { size } => {
                write!(f, "kernel size must be odd and positive, got {size}")
            }
            FilterError::KernelLength { expected, actual } => {
                write!(f, "kernel has {actual} weights, expected {expected}")
            }
            FilterError::NegativeLevel { level } => {
                write!(f, "wavelet level must be non-negative, got {level}")
            }
            FilterError::NotPowerOfTwo { width, height } => {
                write!(f, "wavelet input must have power-of-two dimensions, got {width}x{height}")
            }
            FilterError::NotGrayscale { x, y } => {
                write!(f, "expected grayscale input, pixel ({x}, {y}) has R, G, B differing")
            }
            FilterError::InvalidDimensions { width, height } => {
                write!(f, "invalid target dimensions {width}x{height}")
            }
            FilterError::UnsupportedFormat { extension } => {
                write!(f, "unsupported image format '{extension}' (use .png or .jpg)")
            }
            FilterError::Image(e) => write!(f, "image error: {e}"),
            FilterError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Image(e) => Some(e),
            FilterError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for FilterError {
    fn from(e: image::ImageError) -> Self {
        FilterError::Image(e)
    }
}

impl From<io::Error> for FilterError {
    fn from(e: io::Error) -> Self {
        FilterError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
