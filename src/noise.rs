//! Gradient noise and fractal composition for texture synthesis
//!
//! The permutation table is built at compile time with a fixed arithmetic
//! scrambler, so every evaluation in every thread reads the same immutable
//! table and repeated runs produce bit-identical fields.

/// Contrast multiplier applied by [`Fbm::amplified`]
pub const CONTRAST: f64 = 3.5;

/// Doubled 256-entry permutation table used to hash lattice corners
///
/// Entry `i` and entry `i + 256` always hold the same value, which lets
/// corner lookups index `perm[perm[xi] + yi + 1]` without wrapping.
pub struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    /// Build the table by scrambling the identity permutation
    ///
    /// Walks from the top index down, swapping each slot with one picked by a
    /// linear-congruential step. The result is fixed for this crate; it is
    /// not meant to match any other implementation.
    pub const fn scrambled() -> Self {
        let mut base = [0u8; 256];
        let mut i = 0;
        while i < 256 {
            base[i] = i as u8;
            i += 1;
        }

        let mut i = 255usize;
        while i > 0 {
            let j = ((i as u64 * 1_664_525 + 1_013_904_223) % (i as u64 + 1)) as usize;
            let tmp = base[i];
            base[i] = base[j];
            base[j] = tmp;
            i -= 1;
        }

        let mut perm = [0u8; 512];
        let mut i = 0;
        while i < 512 {
            perm[i] = base[i & 255];
            i += 1;
        }

        PermutationTable { perm }
    }

    /// Look up a permutation entry, wrapping indices past the doubled range
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    /// Check the table invariant: each of 0..=255 appears at `i` and `i + 256`
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 256];
        for i in 0..256 {
            if self.perm[i] != self.perm[i + 256] || seen[self.perm[i] as usize] {
                return false;
            }
            seen[self.perm[i] as usize] = true;
        }
        seen.iter().all(|&s| s)
    }

    /// Sample 2D gradient noise at a continuous position
    ///
    /// Total over finite inputs; negative and very large coordinates wrap
    /// into the 256-cell lattice. The result is clamped to [-1, 1].
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = lattice_index(x_floor);
        let yi = lattice_index(y_floor);
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let row_a = self.get(xi) as usize;
        let row_b = self.get(xi + 1) as usize;
        let aa = self.get(row_a + yi);
        let ab = self.get(row_a + yi + 1);
        let ba = self.get(row_b + yi);
        let bb = self.get(row_b + yi + 1);

        let value = lerp(
            lerp(gradient(aa, xf, yf), gradient(ba, xf - 1.0, yf), u),
            lerp(gradient(ab, xf, yf - 1.0), gradient(bb, xf - 1.0, yf - 1.0), u),
            v,
        );

        value.clamp(-1.0, 1.0)
    }
}

/// Process-wide permutation table shared by all noise evaluations
pub static PERMUTATION: PermutationTable = PermutationTable::scrambled();

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Map a floored coordinate to a lattice cell in 0..256
#[inline]
fn lattice_index(floored: f64) -> usize {
    (floored as i64).rem_euclid(256) as usize
}

/// Dot product of the offset with one of eight lattice gradients
#[inline]
fn gradient(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Sample 2D gradient noise from the shared permutation table
#[inline]
pub fn noise2d(x: f64, y: f64) -> f64 {
    PERMUTATION.noise2d(x, y)
}

/// Parameters for fractal Brownian motion
///
/// Each octave samples [`noise2d`] at `lacunarity` times the previous
/// frequency and `gain` times the previous amplitude. The sum is normalized
/// by the total amplitude, then optionally widened by `contrast` and
/// clamped back into [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fbm {
    /// Number of noise layers
    pub octaves: u32,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves
    pub gain: f64,
    /// Optional post-scale applied to the normalized sum before clamping
    pub contrast: Option<f64>,
}

impl Default for Fbm {
    fn default() -> Self {
        Fbm {
            octaves: 6,
            lacunarity: 2.0,
            gain: 0.5,
            contrast: None,
        }
    }
}

impl Fbm {
    pub const fn new(octaves: u32, lacunarity: f64, gain: f64) -> Self {
        Fbm {
            octaves,
            lacunarity,
            gain,
            contrast: None,
        }
    }

    /// Same layering with the standard [`CONTRAST`] post-scale
    pub const fn amplified(self) -> Self {
        self.with_contrast(CONTRAST)
    }

    pub const fn with_contrast(mut self, contrast: f64) -> Self {
        self.contrast = Some(contrast);
        self
    }

    /// Evaluate the fractal field at `(x, y)`
    ///
    /// Returns 0.0 for zero octaves.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += amplitude * noise2d(x * frequency, y * frequency);
            max_amplitude += amplitude;
            amplitude *= self.gain;
            frequency *= self.lacunarity;
        }

        if max_amplitude <= 0.0 {
            return 0.0;
        }

        let normalized = total / max_amplitude;
        match self.contrast {
            Some(contrast) => (normalized * contrast).clamp(-1.0, 1.0),
            None => normalized,
        }
    }

    /// Magnitude of the symmetric finite-difference vector around `(x, y)`
    ///
    /// Not divided by the step width; callers scale the result to taste.
    pub fn central_difference(&self, x: f64, y: f64, epsilon: f64) -> f64 {
        let dx = self.sample(x + epsilon, y) - self.sample(x - epsilon, y);
        let dy = self.sample(x, y + epsilon) - self.sample(x, y - epsilon);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Raw normalized fBm, kept for call sites that only need the positional form
pub fn fbm(x: f64, y: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
    Fbm::new(octaves, lacunarity, gain).sample(x, y)
}
