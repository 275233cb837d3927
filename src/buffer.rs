//! RGBA8 pixel buffer shared by every filter.
//!
//! Pixels live in an ndarray of shape `(height, width, 4)` in standard
//! (row-major) layout, channel order (R, G, B, A):
//!
//! ```text
//!   byte:   0 1 2 3 | 4 5 6 7 | ...
//!   pixel:  (0, 0)  | (1, 0)  | ...
//! ```
//!
//! The length is always exactly `4 * width * height`. Filters take a
//! `&PixelBuffer` and return a freshly allocated one; none of them mutate
//! their input.

use ndarray::{Array2, Array3, ArrayView3, Axis};

use crate::error::{FilterError, Result};

/// Red channel byte offset within a pixel.
pub const R: usize = 0;
/// Green channel byte offset within a pixel.
pub const G: usize = 1;
/// Blue channel byte offset within a pixel.
pub const B: usize = 2;
/// Alpha channel byte offset within a pixel.
pub const A: usize = 3;

/// Bytes per pixel.
pub const CHANNELS: usize = 4;

/// A width x height grid of RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    // Always standard layout with a zero offset.
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create an opaque white image.
    ///
    /// # Panics
    /// Panics if `width` or `height` is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "pixel buffer must have positive area ({width}x{height})"
        );
        PixelBuffer {
            data: Array3::from_elem((height, width, CHANNELS), 255),
        }
    }

    /// Wrap existing RGBA bytes.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::EmptyImage { width, height });
        }
        let expected = width * height * CHANNELS;
        let actual = data.len();
        let data = Array3::from_shape_vec((height, width, CHANNELS), data)
            .map_err(|_| FilterError::BufferLength { expected, actual })?;
        Ok(PixelBuffer { data })
    }

    /// Build an image where every pixel is gray `level` with the given alpha.
    pub fn from_gray_levels(width: usize, height: usize, levels: &[u8], alpha: u8) -> Result<Self> {
        if levels.len() != width * height {
            return Err(FilterError::BufferLength {
                expected: width * height * CHANNELS,
                actual: levels.len() * CHANNELS,
            });
        }
        let data = levels
            .iter()
            .flat_map(|&v| [v, v, v, alpha])
            .collect();
        Self::from_raw(width, height, data)
    }

    /// Copy an ndarray image of shape (height, width, 4).
    pub fn from_array(input: ArrayView3<u8>) -> Result<Self> {
        let (height, width, channels) = input.dim();
        if channels != CHANNELS {
            return Err(FilterError::ChannelCount { found: channels });
        }
        // Logical iteration order is (y, x, c), matching our layout.
        Self::from_raw(width, height, input.iter().copied().collect())
    }

    /// Copy into an ndarray image of shape (height, width, 4).
    pub fn to_array(&self) -> Array3<u8> {
        self.data.clone()
    }

    /// Borrow as an ndarray image of shape (height, width, 4).
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Always false; zero-area buffers cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width() && y < self.height());
        (y * self.width() + x) * CHANNELS
    }

    /// The 4 channel bytes of pixel (x, y).
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let i = self.offset(x, y);
        &self.as_raw()[i..i + CHANNELS]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let i = self.offset(x, y);
        &mut self.as_raw_mut()[i..i + CHANNELS]
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.data
            .as_slice()
            .expect("pixel buffer is always in standard layout")
    }

    #[inline]
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        self.data
            .as_slice_mut()
            .expect("pixel buffer is always in standard layout")
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    pub fn fill(&mut self, r: u8, g: u8, b: u8, a: u8) {
        for mut px in self.data.lanes_mut(Axis(2)) {
            px.assign(&ndarray::arr1(&[r, g, b, a]));
        }
    }

    /// Fill with gray `level` and alpha `a`.
    pub fn fill_level(&mut self, level: u8, a: u8) {
        self.fill(level, level, level, a);
    }

    /// Red channel as a single-channel (height, width) plane.
    pub fn red_plane(&self) -> Array2<u8> {
        self.data.index_axis(Axis(2), R).to_owned()
    }

    /// First pixel whose R, G and B differ, if any.
    pub fn first_non_gray(&self) -> Option<(usize, usize)> {
        let width = self.width();
        self.as_raw()
            .chunks_exact(CHANNELS)
            .position(|px| px[R] != px[G] || px[G] != px[B])
            .map(|i| (i % width, i / width))
    }

    pub fn is_grayscale(&self) -> bool {
        self.first_non_gray().is_none()
    }
}
