//! Points of interest: reward containers and the halos around them.

use super::TerrainGenerator;
use crate::cell::{Cell, Material};
use crate::chunk::{Chunk, CHUNK_SIZE, CHUNK_SIZE_I64};
use crate::config::HaloRadii;

/// Containers need at least this many stratified 8-neighbours.
const MIN_SOLID_NEIGHBOURS: usize = 4;

impl TerrainGenerator {
    /// Places containers, then halos around containers and heavy rock.
    ///
    /// Heavy rock up to the halo reach outside the chunk is found from the
    /// layering its own chunk settles on, so rock halos run on across chunk
    /// borders. Container halos stay clipped to the chunk that owns them.
    ///
    /// Returns the number of containers placed.
    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn place_points_of_interest(&self, chunk: &mut Chunk) -> usize {
        let containers = self.place_containers(chunk);

        for &(x, y) in &containers {
            let center = (chunk.world_x(x), chunk.world_y(y));
            self.apply_halo(chunk, center, self.config.container_halo);
        }

        let margin = self.config.rock_halo.max.ceil() as i64;
        let (left, top) = (chunk.world_x(0), chunk.world_y(0));
        let mut rocks = Vec::new();
        for y in top - margin..top + CHUNK_SIZE_I64 + margin {
            for x in left - margin..left + CHUNK_SIZE_I64 + margin {
                let rock = match chunk.get_signed(x - left, y - top) {
                    Some(cell) => cell.material() == Material::HeavyRock,
                    None => self.settles_heavy_rock(x, y),
                };
                if rock {
                    rocks.push((x, y));
                }
            }
        }
        for &center in &rocks {
            self.apply_halo(chunk, center, self.config.rock_halo);
        }

        containers.len()
    }

    /// Returns true if world `(x, y)` is heavy rock once its own chunk is
    /// generated. No pass creates heavy rock and only the escapability patch
    /// removes it.
    fn settles_heavy_rock(&self, x: i64, y: i64) -> bool {
        let c = &self.config;
        if self.rock_hash.random(x, y) >= c.near_surface_rock_chance.max(c.deep_rock_chance) {
            return false;
        }
        self.raw_cell(x, y).material() == Material::HeavyRock && !self.is_escape_patch(x, y)
    }

    /// Rolls each candidate and writes the ones that qualify.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn place_containers(&self, chunk: &mut Chunk) -> Vec<(usize, usize)> {
        let c = &self.config;
        let attempts = i64::from(c.container_attempts);
        let key_y = i64::from(chunk.coord.y);
        let mut placed = Vec::new();

        for attempt in 0..attempts {
            let key_x = i64::from(chunk.coord.x) * attempts + attempt;
            if self.container_roll.random(key_x, key_y) >= c.container_chance {
                continue;
            }

            let x = ((self.container_x.random(key_x, key_y) * CHUNK_SIZE as f64) as usize)
                .min(CHUNK_SIZE - 1);
            let y = ((self.container_y.random(key_x, key_y) * CHUNK_SIZE as f64) as usize)
                .min(CHUNK_SIZE - 1);

            let cell = chunk.get(x, y);
            let Material::Stratum(tier) = cell.material() else {
                continue;
            };
            if chunk.world_y(y) < c.safe_depth || stratum_neighbours(chunk, x, y) < MIN_SOLID_NEIGHBOURS {
                continue;
            }

            chunk.put(x, y, Cell::new(Material::Container(tier)).with_variant(cell.variant()));
            placed.push((x, y));
        }

        placed
    }

    /// Writes the halo around world `center`, clipped to this chunk.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn apply_halo(&self, chunk: &mut Chunk, center: (i64, i64), radii: HaloRadii) {
        let origin = (chunk.world_x(0), chunk.world_y(0));

        for member in self.halos.generate(center, radii.min, radii.max) {
            let lx = member.x - origin.0;
            let ly = member.y - origin.1;
            if !(0..CHUNK_SIZE_I64).contains(&lx) || !(0..CHUNK_SIZE_I64).contains(&ly) {
                continue;
            }
            let (lx, ly) = (lx as usize, ly as usize);
            let intensity = member.intensity_byte();

            let cell = chunk.get(lx, ly);
            let overlaid = match cell.material() {
                Material::Stratum(tier) => Cell::new(Material::Overlay(tier))
                    .with_variant(cell.variant())
                    .with_overlay(intensity),
                Material::Overlay(_) => cell.with_overlay(cell.overlay_intensity().max(intensity)),
                _ => continue,
            };
            chunk.put(lx, ly, overlaid);
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
fn stratum_neighbours(chunk: &Chunk, x: usize, y: usize) -> usize {
    let (x, y) = (x as i64, y as i64);
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx, dy) == (0, 0) {
                continue;
            }
            if chunk
                .get_signed(x + dx, y + dy)
                .is_some_and(|cell| cell.material().is_stratum())
            {
                count += 1;
            }
        }
    }
    count
}
