//! # World Seed
//!
//! Every random-looking decision in the world derives from one `WorldSeed`.
//! Sub-systems never share a stream: each one asks for its own sub-seed via
//! [`WorldSeed::derive`], so adding a new consumer never shifts the output
//! of an existing one.

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Seed used when the caller supplies something unusable.
    pub const FALLBACK: u64 = 0xDEAD_BEEF_CAFE_BABE;

    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Builds a seed from an arbitrary numeric value.
    ///
    /// Integral values map onto the integer seed, so `12345.0` and
    /// `WorldSeed::new(12345)` describe the same world. Fractional values use
    /// their bit pattern. NaN and infinities collapse to the fallback seed.
    #[must_use]
    #[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_number(value: f64) -> Self {
        if !value.is_finite() {
            tracing::warn!(value, "non-finite world seed, using fallback");
            return Self::default();
        }

        if value.trunc() == value && value.abs() < 9.0e18 {
            // Two's complement keeps negative integral seeds distinct.
            Self((value as i64) as u64)
        } else {
            Self(value.to_bits())
        }
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0 ^ purpose.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(Self::FALLBACK)
    }
}

impl From<u64> for WorldSeed {
    fn from(seed: u64) -> Self {
        Self::new(seed)
    }
}
