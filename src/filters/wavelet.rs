//! Multi-level Haar wavelet decomposition for visualization.
//!
//! Each pass splits the current top-left quadrant into 2x2 blocks
//! `(a, b, c, d)` = (top-left, top-right, bottom-left, bottom-right) of the
//! red channel and writes:
//!
//! ```text
//!   +------+------+
//!   |  LL  |  HL  |   LL = (a + b + c + d) / 4
//!   +------+------+   HL = |a - b + c - d| / 4 * scale
//!   |  LH  |  HH  |   LH = |a + b - c - d| / 4 * scale
//!   +------+------+   HH = |a - b - c + d| / 4 * scale * scale
//! ```
//!
//! The next pass runs inside the LL quadrant only. The decomposition is
//! lossy and meant for display, not reconstruction.

use ndarray::{s, Array2};

use crate::buffer::{PixelBuffer, B, G, R};
use crate::error::{FilterError, Result};

#[inline]
fn detail(sum: i32, scale: f32) -> u8 {
    // Integer quarter first, then float gain truncated back to int.
    ((sum.abs() / 4) as f32 * scale).clamp(0.0, 255.0) as u8
}

#[inline]
fn diagonal_detail(sum: i32, scale: f32) -> u8 {
    // Gain applied twice, left to right: (q * scale) * scale.
    ((sum.abs() / 4) as f32 * scale * scale).clamp(0.0, 255.0) as u8
}

/// One decomposition pass over the `w` x `h` top-left region of `plane`.
fn haar_pass(plane: &Array2<u8>, w: usize, h: usize, scale: f32) -> Array2<u8> {
    let mut out = plane.clone();
    let half_w = w / 2;
    let half_h = h / 2;

    for y in 0..half_h {
        for x in 0..half_w {
            let a = plane[[2 * y, 2 * x]] as i32;
            let b = plane[[2 * y, 2 * x + 1]] as i32;
            let c = plane[[2 * y + 1, 2 * x]] as i32;
            let d = plane[[2 * y + 1, 2 * x + 1]] as i32;

            out[[y, x]] = ((a + b + c + d) / 4).clamp(0, 255) as u8;
            out[[y, half_w + x]] = detail(a - b + c - d, scale);
            out[[half_h + y, x]] = detail(a + b - c - d, scale);
            out[[half_h + y, half_w + x]] = diagonal_detail(a - b - c + d, scale);
        }
    }

    out
}

/// Run `level` passes on the red channel of `image` and return a gray
/// visualization of the coefficient pyramid.
///
/// `level == 0` returns an exact copy. Dimensions must be powers of two;
/// callers should grayscale the input first. Alpha is carried over from the
/// input unchanged.
pub fn haar_wavelet_transform(image: &PixelBuffer, level: i32, scale: f32) -> Result<PixelBuffer> {
    if level < 0 {
        return Err(FilterError::NegativeLevel { level });
    }
    let (width, height) = (image.width(), image.height());
    if !width.is_power_of_two() || !height.is_power_of_two() {
        return Err(FilterError::NotPowerOfTwo { width, height });
    }
    if level == 0 {
        return Ok(image.clone());
    }

    let mut plane = image.red_plane();
    let (mut cur_w, mut cur_h) = (width, height);
    for _ in 0..level {
        plane = haar_pass(&plane, cur_w, cur_h, scale);
        cur_w /= 2;
        cur_h /= 2;
    }

    let mut out = image.clone();
    for ((y, x), &v) in plane.indexed_iter() {
        let px = out.pixel_mut(x, y);
        px[R] = v;
        px[G] = v;
        px[B] = v;
    }
    Ok(out)
}

/// LL quadrant of a plane after `level` passes: the top-left
/// `(height >> level) x (width >> level)` region.
pub fn approximation(plane: &Array2<u8>, level: u32) -> Array2<u8> {
    let (h, w) = plane.dim();
    let lh = (h >> level).max(1);
    let lw = (w >> level).max(1);
    plane.slice(s![..lh, ..lw]).to_owned()
}
