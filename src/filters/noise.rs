//! Gaussian noise fields via the Box-Muller transform.
//!
//! Randomness comes from an explicit, seedable [`NoiseRng`]; there is no
//! hidden global generator. Two generators with the same seed produce
//! bit-identical noise.

use std::f64::consts::PI;

// ============================================================================
// Seedable RNG
// ============================================================================

const MINSTD_MULTIPLIER: u64 = 48271;
const MINSTD_MODULUS: u64 = 2_147_483_647;

/// Park-Miller (MINSTD) generator producing uniform doubles in [0, 1).
#[derive(Clone, Debug)]
pub struct NoiseRng {
    state: u64,
}

impl Default for NoiseRng {
    fn default() -> Self {
        NoiseRng::new(0)
    }
}

impl NoiseRng {
    pub fn new(seed: u64) -> Self {
        let mut rng = NoiseRng { state: 1 };
        rng.seed(seed);
        rng
    }

    /// Restart the stream from `seed`.
    pub fn seed(&mut self, seed: u64) {
        // State must lie in [1, m - 1].
        self.state = seed % (MINSTD_MODULUS - 1) + 1;
    }

    /// Next raw state in [1, m - 1].
    fn next_state(&mut self) -> u64 {
        self.state = self.state * MINSTD_MULTIPLIER % MINSTD_MODULUS;
        self.state
    }

    /// Uniform double in [0, 1). Exactly 0 is reachable.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_state() - 1) as f64 / (MINSTD_MODULUS - 1) as f64
    }
}

// ============================================================================
// Box-Muller
// ============================================================================

/// One Box-Muller pair from uniform draws `r` and `phi`.
///
/// `ln(0)` is treated as 0, so a zero `r` yields a (0, 0) pair instead of
/// infinities. This slightly biases that one pair toward zero.
#[inline]
pub fn box_muller(r: f64, phi: f64, sigma: f64) -> (f64, f64) {
    let ln_r = if r == 0.0 { 0.0 } else { r.ln() };
    let radius = (-2.0 * ln_r).sqrt();
    let angle = 2.0 * PI * phi;
    (sigma * angle.cos() * radius, sigma * angle.sin() * radius)
}

/// Fill `out` with normally distributed samples of mean 0 and std `sigma`.
///
/// Draws two uniforms per output pair. For an odd length the last slot gets
/// the first half of a fresh pair and the second half is discarded.
pub fn generate_gaussian_noise(out: &mut [f32], sigma: f32, rng: &mut NoiseRng) {
    let sigma = sigma as f64;
    for pair in out.chunks_mut(2) {
        let r = rng.next_f64();
        let phi = rng.next_f64();
        let (z1, z2) = box_muller(r, phi, sigma);
        pair[0] = z1 as f32;
        if let Some(second) = pair.get_mut(1) {
            *second = z2 as f32;
        }
    }
}

/// Allocate and fill a noise field of `count` samples.
pub fn gaussian_noise(count: usize, sigma: f32, rng: &mut NoiseRng) -> Vec<f32> {
    let mut noise = vec![0.0f32; count];
    generate_gaussian_noise(&mut noise, sigma, rng);
    noise
}
