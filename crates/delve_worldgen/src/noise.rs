//! # Noise & Lattice Hash
//!
//! Two independent primitives feed every higher layer:
//!
//! - [`SimplexNoise`]: spatially correlated 2D noise in `[-1, 1]`, used for
//!   anything organic (cavern shapes, cosmetic blending, halo edges).
//! - [`LatticeHash`]: an uncorrelated value in `[0, 1)` per integer lattice
//!   point, used for independent per-cell decisions (rock placement, ring
//!   offsets, container rolls).
//!
//! ## Determinism Guarantee
//!
//! Both are pure functions of the seed and their coordinates. Nothing is
//! advanced between calls, so chunks can be generated in any order.

use std::f64::consts::PI;

use crate::seed::WorldSeed;

/// 12 gradient directions for 2D simplex.
const GRADIENTS: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

/// Seeded permutation of `0..256`, doubled to skip index wrapping.
struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for value in 0..=255u8 {
            perm[usize::from(value)] = value;
        }

        // Fisher-Yates driven by xorshift64. A zero state would stall the
        // generator, so it is nudged off zero first.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            #[allow(clippy::cast_possible_truncation)]
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous values in `[-1, 1]`.
///
/// # Example
///
/// ```rust,ignore
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.sample(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
pub struct SimplexNoise {
    table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid, `(sqrt(3) - 1) / 2`.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor for 2D simplex grid, `(3 - sqrt(3)) / 6`.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise. Returns a value in `[-1, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        let (i1, j1): (u8, u8) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let (i1, j1) = (usize::from(i1), usize::from(j1));

        let g0 = self.table.get(ii + self.table.get(jj));
        let g1 = self.table.get(ii + i1 + self.table.get(jj + j1));
        let g2 = self.table.get(ii + 1 + self.table.get(jj + 1));

        let total = corner(x0, y0, g0) + corner(x1, y1, g1) + corner(x2, y2, g2);

        // 70 rescales the summed corner kernels to [-1, 1].
        (70.0 * total).clamp(-1.0, 1.0)
    }

    /// Samples noise remapped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn sample_unit(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) * 0.5
    }

    /// Fractal sum of `octaves` layers, normalized back to `[-1, 1]`.
    ///
    /// * `persistence` - Amplitude decay per octave (typically 0.5)
    /// * `lacunarity` - Frequency increase per octave (typically 2.0)
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }
}

/// Contribution of one simplex corner.
#[inline]
fn corner(x: f64, y: f64, hash: usize) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let grad = GRADIENTS[hash % GRADIENTS.len()];
    let t2 = t * t;
    t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
}

/// Floor to an integer lattice coordinate.
///
/// Works in `i64` so far-away chunks cannot overflow the lattice math.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 {
        xi - 1
    } else {
        xi
    }
}

/// Uncorrelated per-lattice-point random values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeHash {
    seed: u64,
}

impl LatticeHash {
    /// Creates a lattice hash from a seed.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self { seed: seed.value() }
    }

    /// Returns a value in `[0, 1)` for the integer point `(ix, iy)`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn random(&self, ix: i64, iy: i64) -> f64 {
        let h = mix64(self.seed ^ (ix as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let h = mix64(h ^ (iy as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
        // Top 53 bits fill the f64 mantissa exactly.
        (h >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Continuous field in `[0, 1)` built by cosine-blending the four
    /// surrounding lattice samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn smooth(&self, x: f64, y: f64) -> f64 {
        let ix = fast_floor(x);
        let iy = fast_floor(y);
        let tx = x - ix as f64;
        let ty = y - iy as f64;

        let top = cosine_interpolate(self.random(ix, iy), self.random(ix + 1, iy), tx);
        let bottom = cosine_interpolate(self.random(ix, iy + 1), self.random(ix + 1, iy + 1), tx);
        cosine_interpolate(top, bottom, ty)
    }
}

/// Cosine interpolation between `a` and `b` at `t` in `[0, 1]`.
#[inline]
#[must_use]
pub fn cosine_interpolate(a: f64, b: f64, t: f64) -> f64 {
    let weight = (1.0 - (t * PI).cos()) * 0.5;
    a + (b - a) * weight
}

/// splitmix64 finalizer.
#[inline]
const fn mix64(mut z: u64) -> u64 {
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
