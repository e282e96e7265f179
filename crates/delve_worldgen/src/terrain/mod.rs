//! # Terrain Generator
//!
//! Pure function from `(seed, chunk coordinate)` to a fully populated chunk.
//!
//! ## Pipeline
//!
//! 1. Raw layering, per cell by depth: sky, surface, near-surface band
//!    (no caverns), ring bands and caverns, magma floor.
//! 2. Escapability repair (`repair`).
//! 3. Ring-surround repair (`repair`).
//! 4. Cosmetic variants (`repair`).
//! 5. Containers and halos (`features`).
//!
//! Every decision reads the seed and integer coordinates only. No RNG
//! stream is advanced, so chunks can be generated in any order.

mod features;
mod repair;
mod ring;

pub use ring::{RingLayout, RingPart};

use crate::cell::{Cell, Material};
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use crate::config::GeneratorConfig;
use crate::error::WorldgenResult;
use crate::halo::HaloGenerator;
use crate::noise::{LatticeHash, SimplexNoise};
use crate::seed::WorldSeed;

/// Sub-seed purposes. Changing one reshuffles only its own concern.
mod purpose {
    pub const CAVERN: u64 = 11;
    pub const COSMETIC: u64 = 12;
    pub const RING: u64 = 13;
    pub const ROCK: u64 = 14;
    pub const CONTAINER_ROLL: u64 = 15;
    pub const CONTAINER_X: u64 = 16;
    pub const CONTAINER_Y: u64 = 17;
    pub const JITTER: u64 = 18;
    pub const HALO: u64 = 19;
    pub const REGION: u64 = 20;
}

/// Wavelength, in cells, of the regional cavern-density wobble.
const REGION_SCALE: f64 = 64.0;
/// Peak-to-peak size of that wobble.
const REGION_AMPLITUDE: f64 = 0.1;

/// Per-world chunk synthesizer.
pub struct TerrainGenerator {
    seed: WorldSeed,
    config: GeneratorConfig,
    rings: RingLayout,
    cavern_noise: SimplexNoise,
    cosmetic_noise: SimplexNoise,
    cavern_region: LatticeHash,
    rock_hash: LatticeHash,
    jitter_hash: LatticeHash,
    container_roll: LatticeHash,
    container_x: LatticeHash,
    container_y: LatticeHash,
    halos: HaloGenerator,
}

impl TerrainGenerator {
    /// Creates a generator with the default layout.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self::build(seed, GeneratorConfig::default())
    }

    /// Creates a generator with a custom layout.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the layout fails validation.
    pub fn with_config(seed: WorldSeed, config: GeneratorConfig) -> WorldgenResult<Self> {
        config.validate()?;
        Ok(Self::build(seed, config))
    }

    fn build(seed: WorldSeed, config: GeneratorConfig) -> Self {
        Self {
            seed,
            config,
            rings: RingLayout::new(seed.derive(purpose::RING), config.ring, config.hazard_depth),
            cavern_noise: SimplexNoise::new(seed.derive(purpose::CAVERN)),
            cosmetic_noise: SimplexNoise::new(seed.derive(purpose::COSMETIC)),
            cavern_region: LatticeHash::new(seed.derive(purpose::REGION)),
            rock_hash: LatticeHash::new(seed.derive(purpose::ROCK)),
            jitter_hash: LatticeHash::new(seed.derive(purpose::JITTER)),
            container_roll: LatticeHash::new(seed.derive(purpose::CONTAINER_ROLL)),
            container_x: LatticeHash::new(seed.derive(purpose::CONTAINER_X)),
            container_y: LatticeHash::new(seed.derive(purpose::CONTAINER_Y)),
            halos: HaloGenerator::new(seed.derive(purpose::HALO)),
        }
    }

    /// The world seed.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The active layout.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The structural ring layout.
    #[must_use]
    pub const fn rings(&self) -> &RingLayout {
        &self.rings
    }

    /// Generates the chunk at `coord`.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);

        for y in 0..CHUNK_SIZE {
            let world_y = chunk.world_y(y);
            for x in 0..CHUNK_SIZE {
                let cell = self.raw_cell(chunk.world_x(x), world_y);
                chunk.put(x, y, cell);
            }
        }

        let sealed_columns = self.enforce_escapability(&mut chunk);
        let ring_fills = self.enforce_ring_surround(&mut chunk);
        self.assign_cosmetic_variants(&mut chunk);
        let containers = self.place_points_of_interest(&mut chunk);

        tracing::debug!(
            chunk = %coord,
            sealed_columns,
            ring_fills,
            containers,
            "chunk generated"
        );

        chunk
    }

    /// Raw layering of one world cell, before any repair pass.
    #[must_use]
    pub fn raw_cell(&self, x: i64, y: i64) -> Cell {
        let c = &self.config;

        if y < c.surface_row {
            return Cell::EMPTY;
        }
        if y == c.surface_row {
            return Cell::new(Material::Surface);
        }
        if y < c.safe_depth {
            if self.rock_hash.random(x, y) < c.near_surface_rock_chance {
                return Cell::new(Material::HeavyRock);
            }
            return Cell::stratum_at(y);
        }
        if y >= c.hazard_depth {
            return Cell::new(Material::Hazard);
        }

        match self.rings.part_at(x, y) {
            Some(RingPart::Border) => return Cell::new(Material::RingFrame),
            Some(RingPart::Interior) => return Cell::new(Material::RingInterior),
            None => {}
        }

        if self.is_cavern(x, y) {
            return Cell::EMPTY;
        }
        if self.rock_hash.random(x, y) < c.deep_rock_chance {
            return Cell::new(Material::HeavyRock);
        }
        Cell::stratum_at(y)
    }

    /// Cavern test for a cell in the carving zone.
    #[allow(clippy::cast_precision_loss)]
    fn is_cavern(&self, x: i64, y: i64) -> bool {
        let c = &self.config;
        let fx = x as f64;
        let fy = y as f64;

        let depth_below_band = (y - c.safe_depth) as f64;
        let base = (c.cavern_threshold_top - c.cavern_threshold_slope * depth_below_band)
            .max(c.cavern_threshold_floor);
        let wobble = (self.cavern_region.smooth(fx / REGION_SCALE, fy / REGION_SCALE) - 0.5)
            * REGION_AMPLITUDE;

        // Caves stretch sideways: vertical frequency is a little higher.
        let value = self.cavern_noise.octaved(
            fx * c.cavern_scale,
            fy * c.cavern_scale * 1.25,
            3,
            0.5,
            2.0,
        );

        value > base + wobble
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Tier;

    fn for_all_cells(chunk: &Chunk, mut f: impl FnMut(i64, i64, Cell)) {
        for (x, y, cell) in chunk.iter() {
            f(chunk.world_x(x), chunk.world_y(y), cell);
        }
    }

    #[test]
    fn test_sky_and_surface_rows() {
        let gen = TerrainGenerator::new(WorldSeed::new(12345));
        let chunk = gen.generate(ChunkCoord::new(0, 0));

        for x in 0..CHUNK_SIZE {
            for y in 0..3 {
                assert_eq!(chunk.get(x, y), Cell::EMPTY, "sky at ({x}, {y})");
            }
            assert_eq!(chunk.get(x, 3).material(), Material::Surface, "surface at x={x}");
        }
    }

    #[test]
    fn test_generation_determinism() {
        let gen1 = TerrainGenerator::new(WorldSeed::new(42));
        let gen2 = TerrainGenerator::new(WorldSeed::new(42));

        for coord in [ChunkCoord::new(5, 10), ChunkCoord::new(-3, 2), ChunkCoord::new(0, 19)] {
            assert!(gen1.generate(coord) == gen2.generate(coord), "chunk {coord} differs");
        }
    }

    #[test]
    fn test_negative_coordinates() {
        let gen = TerrainGenerator::new(WorldSeed::new(12345));
        let a = gen.generate(ChunkCoord::new(-5, 10));
        let b = gen.generate(ChunkCoord::new(-5, 10));
        assert!(a == b);

        // Above the sky everything is air.
        let above = gen.generate(ChunkCoord::new(-5, -1));
        assert_eq!(above.count(|c| c == Cell::EMPTY), CHUNK_SIZE * CHUNK_SIZE);
    }

    #[test]
    fn test_extreme_coordinates_do_not_panic() {
        let gen = TerrainGenerator::new(WorldSeed::new(1));
        for coord in [
            ChunkCoord::new(i32::MAX, 5),
            ChunkCoord::new(i32::MIN, 5),
            ChunkCoord::new(0, i32::MAX),
            ChunkCoord::new(i32::MIN, i32::MIN),
        ] {
            let _ = gen.generate(coord);
        }
    }

    #[test]
    fn test_hazard_floor_is_solid_layer_of_magma() {
        let gen = TerrainGenerator::new(WorldSeed::new(9));
        let hazard_chunk_y = i32::try_from(gen.config().hazard_depth / 32 + 1).unwrap();
        let chunk = gen.generate(ChunkCoord::new(3, hazard_chunk_y));
        assert!(chunk.iter().all(|(_, _, c)| c.material() == Material::Hazard));
    }

    #[test]
    fn test_near_surface_band_has_no_caverns() {
        let gen = TerrainGenerator::new(WorldSeed::new(77));
        for cx in -10..10 {
            let chunk = gen.generate(ChunkCoord::new(cx, 0));
            for_all_cells(&chunk, |_, y, cell| {
                if y > 3 && y < gen.config().safe_depth {
                    assert!(cell.is_solid(), "open cell at depth {y} inside the safe band");
                }
            });
        }
    }

    #[test]
    fn test_stratum_hit_points_follow_depth_tier() {
        let gen = TerrainGenerator::new(WorldSeed::new(31));
        for cy in [0, 3, 8, 15] {
            let chunk = gen.generate(ChunkCoord::new(1, cy));
            for_all_cells(&chunk, |_, y, cell| {
                if let Material::Stratum(tier) = cell.material() {
                    assert_eq!(tier, Tier::for_depth(y));
                    assert_eq!(cell.hit_points(), tier.hit_points());
                }
            });
        }
    }

    #[test]
    fn test_world_has_caverns_and_rings() {
        let gen = TerrainGenerator::new(WorldSeed::new(2024));
        let mut caverns = 0;
        let mut frames = 0;
        for cy in 1..6 {
            for cx in -6..6 {
                let chunk = gen.generate(ChunkCoord::new(cx, cy));
                caverns += chunk.count(|c| c.material() == Material::Empty);
                frames += chunk.count(|c| c.material() == Material::RingFrame);
            }
        }
        assert!(caverns > 0, "expected some caverns below the safe band");
        assert!(frames > 0, "expected at least one structural ring");
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = TerrainGenerator::new(WorldSeed::new(1)).generate(ChunkCoord::new(0, 3));
        let b = TerrainGenerator::new(WorldSeed::new(2)).generate(ChunkCoord::new(0, 3));
        assert!(a != b);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.hazard_depth = 0;
        assert!(TerrainGenerator::with_config(WorldSeed::new(1), config).is_err());
    }
}
