//! # Halo Generation
//!
//! A halo is an organic cluster of overlay cells around a point of interest
//! (a reward container, a heavy rock). Cells are scored by a radial falloff
//! blended with simplex noise, then every compass direction that ended up
//! empty gets one fallback cell so no halo is missing a lobe.
//!
//! Intensity uses a single linear curve:
//!
//! ```text
//! intensity = 1 - (d - min) / (max - min + 1)
//! ```
//!
//! so the innermost ring is full strength and the outer edge never reaches 0.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_8};

use crate::noise::SimplexNoise;
use crate::seed::WorldSeed;

/// Weight of the radial falloff term in the placement score.
const FALLOFF_WEIGHT: f64 = 0.65;
/// Weight of the noise term in the placement score.
const NOISE_WEIGHT: f64 = 0.35;
/// Scores at or below this are rejected.
const ACCEPT_THRESHOLD: f64 = 0.45;
/// World-space frequency of the edge noise.
const NOISE_SCALE: f64 = 0.31;
/// Half-width of a compass window (22.5 degrees).
const WINDOW: f64 = FRAC_PI_8;

/// Largest radius a halo may span. Wider requests produce an empty halo.
pub const MAX_RADIUS: f64 = 8.0;

/// Unit steps for N, NE, E, SE, S, SW, W, NW. `y` grows downward.
pub const COMPASS: [(i64, i64); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// One accepted halo position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaloCell {
    /// World X.
    pub x: i64,
    /// World Y.
    pub y: i64,
    /// Overlay strength in `(0, 1]`, decreasing with distance.
    pub intensity: f32,
}

impl HaloCell {
    /// Intensity quantized for storage in a cell.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn intensity_byte(&self) -> u8 {
        (self.intensity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Seeded halo generator.
pub struct HaloGenerator {
    noise: SimplexNoise,
}

impl HaloGenerator {
    /// Creates a halo generator.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            noise: SimplexNoise::new(seed),
        }
    }

    /// Generates the halo around `center`.
    ///
    /// Every member lies at a distance in `[min_radius, max_radius]` and the
    /// centre itself is never included. Invalid bounds (non-finite, negative,
    /// inverted or past [`MAX_RADIUS`]) produce an empty halo.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn generate(&self, center: (i64, i64), min_radius: f64, max_radius: f64) -> Vec<HaloCell> {
        if !valid_bounds(min_radius, max_radius) {
            return Vec::new();
        }

        let (cx, cy) = center;
        let reach = max_radius.floor() as i64;
        let mut cells = Vec::new();

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                if distance < min_radius || distance > max_radius {
                    continue;
                }

                let falloff = 1.0 - distance / (max_radius + 1.0);
                let edge = self
                    .noise
                    .sample_unit((cx + dx) as f64 * NOISE_SCALE, (cy + dy) as f64 * NOISE_SCALE);
                let score = FALLOFF_WEIGHT * falloff + NOISE_WEIGHT * edge;

                if score > ACCEPT_THRESHOLD {
                    cells.push(member(center, dx, dy, distance, min_radius, max_radius));
                }
            }
        }

        for direction in COMPASS {
            let covered = cells
                .iter()
                .any(|cell| in_window((cell.x - cx, cell.y - cy), direction));
            if covered {
                continue;
            }
            let Some((dx, dy, distance)) = fallback_offset(direction, min_radius, max_radius) else {
                continue;
            };
            let occupied = cells.iter().any(|cell| cell.x == cx + dx && cell.y == cy + dy);
            if !occupied {
                cells.push(member(center, dx, dy, distance, min_radius, max_radius));
            }
        }

        cells
    }
}

/// One-shot halo generation for callers without a long-lived generator.
#[must_use]
pub fn generate_halo(
    center: (i64, i64),
    min_radius: f64,
    max_radius: f64,
    seed: WorldSeed,
) -> Vec<HaloCell> {
    HaloGenerator::new(seed).generate(center, min_radius, max_radius)
}

/// Returns true if `offset` lies within 22.5 degrees of `direction`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn in_window(offset: (i64, i64), direction: (i64, i64)) -> bool {
    if offset == (0, 0) {
        return false;
    }
    let angle = (offset.1 as f64).atan2(offset.0 as f64);
    let target = (direction.1 as f64).atan2(direction.0 as f64);
    let mut diff = (angle - target).abs();
    if diff > std::f64::consts::PI {
        diff = std::f64::consts::TAU - diff;
    }
    diff <= WINDOW + 1e-9
}

fn valid_bounds(min_radius: f64, max_radius: f64) -> bool {
    min_radius.is_finite()
        && max_radius.is_finite()
        && min_radius >= 0.0
        && min_radius <= max_radius
        && max_radius <= MAX_RADIUS
}

/// Lattice point exactly on `direction` at the smallest distance not below
/// `min_radius`, or `None` if that point lies beyond `max_radius`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn fallback_offset(direction: (i64, i64), min_radius: f64, max_radius: f64) -> Option<(i64, i64, f64)> {
    let diagonal = direction.0 != 0 && direction.1 != 0;
    let steps = if diagonal {
        (min_radius * FRAC_1_SQRT_2).ceil()
    } else {
        min_radius.ceil()
    }
    .max(1.0) as i64;

    let (dx, dy) = (direction.0 * steps, direction.1 * steps);
    let distance = ((dx * dx + dy * dy) as f64).sqrt();
    (distance <= max_radius + 1e-9).then_some((dx, dy, distance))
}

#[allow(clippy::cast_possible_truncation)]
fn member(center: (i64, i64), dx: i64, dy: i64, distance: f64, min: f64, max: f64) -> HaloCell {
    let intensity = (1.0 - (distance - min) / (max - min + 1.0)).clamp(0.0, 1.0);
    HaloCell {
        x: center.0 + dx,
        y: center.1 + dy,
        intensity: intensity as f32,
    }
}
