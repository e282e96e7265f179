//! Invariant repair and cosmetic passes.
//!
//! These run on the raw layering, in order: escapability, ring surround,
//! cosmetic variants. Each only ever turns open cells into diggable rock or
//! rewrites cosmetic fields, so a later pass cannot undo an earlier one.

use std::collections::VecDeque;

use super::TerrainGenerator;
use crate::cell::{Cell, Material, VARIANT_COUNT};
use crate::chunk::{Chunk, CHUNK_SIZE, CHUNK_SIZE_I64};

/// World-space frequency of the cosmetic noise.
const VARIANT_NOISE_SCALE: f64 = 0.09;
/// Blend weights for distance, noise and depth.
const DISTANCE_WEIGHT: f64 = 0.45;
const NOISE_WEIGHT: f64 = 0.35;
const DEPTH_WEIGHT: f64 = 0.2;
/// Peak-to-peak hash jitter.
const JITTER: f64 = 0.15;

impl TerrainGenerator {
    /// Guarantees every column has a way through below `safe_depth`.
    ///
    /// Returns the number of columns that had to be patched.
    pub(super) fn enforce_escapability(&self, chunk: &mut Chunk) -> usize {
        let Some((start, middle)) = self.escape_band(chunk.world_y(0)) else {
            return 0;
        };

        let mut patched = 0;
        for x in 0..CHUNK_SIZE {
            let open = (start..CHUNK_SIZE).any(|y| chunk.get(x, y).is_escapable());
            if !open {
                chunk.put(x, middle, Cell::stratum_at(chunk.world_y(middle)));
                patched += 1;
            }
        }
        patched
    }

    /// Rows scanned by the escapability pass in the chunk whose first row is
    /// world `top`, and the row it patches. `None` above the safe band.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn escape_band(&self, top: i64) -> Option<(usize, usize)> {
        let start = (self.config.safe_depth - top).clamp(0, CHUNK_SIZE_I64) as usize;
        (start < CHUNK_SIZE).then_some((start, (start + CHUNK_SIZE - 1) / 2))
    }

    /// Returns true if the escapability pass rewrites world `(x, y)` when
    /// that cell's own chunk is generated.
    #[allow(clippy::cast_possible_wrap)]
    pub(super) fn is_escape_patch(&self, x: i64, y: i64) -> bool {
        let top = y - y.rem_euclid(CHUNK_SIZE_I64);
        let Some((start, middle)) = self.escape_band(top) else {
            return false;
        };
        y - top == middle as i64
            && (start..CHUNK_SIZE).all(|row| !self.raw_cell(x, top + row as i64).is_escapable())
    }

    /// Returns true if world `(x, y)` is open once its own chunk has been
    /// through the repair passes.
    ///
    /// Escapability patches only replace solid cells, so openness is the raw
    /// layering minus what the ring-surround pass fills.
    fn settles_open(&self, x: i64, y: i64) -> bool {
        let cell = self.raw_cell(x, y);
        !cell.is_solid()
            && (cell.material() == Material::RingInterior || !self.rings.touches_border(x, y))
    }

    /// Fills every open cell that touches a ring frame from outside.
    ///
    /// The frame test is the pure ring layout, so frames in neighbouring
    /// chunks are honoured. Returns the number of cells filled.
    pub(super) fn enforce_ring_surround(&self, chunk: &mut Chunk) -> usize {
        let mut filled = 0;
        for y in 0..CHUNK_SIZE {
            let world_y = chunk.world_y(y);
            for x in 0..CHUNK_SIZE {
                let cell = chunk.get(x, y);
                if cell.is_solid() || cell.material() == Material::RingInterior {
                    continue;
                }
                if self.rings.touches_border(chunk.world_x(x), world_y) {
                    chunk.put(x, y, Cell::stratum_at(world_y));
                    filled += 1;
                }
            }
        }
        filled
    }

    /// Picks a cosmetic variant for every stratified cell.
    ///
    /// Rock next to open space, rock in noisy patches and deeper rock lean
    /// toward higher variants. Hit points are left alone.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub(super) fn assign_cosmetic_variants(&self, chunk: &mut Chunk) {
        let c = &self.config;
        let radius = c.variant_search_radius;
        let distances = self.open_distances(chunk, radius);
        let depth_span = (c.hazard_depth - c.surface_row) as f64;

        for y in 0..CHUNK_SIZE {
            let world_y = chunk.world_y(y);
            let depth_bias = ((world_y - c.surface_row) as f64 / depth_span).clamp(0.0, 1.0);

            for x in 0..CHUNK_SIZE {
                let cell = chunk.get(x, y);
                if !cell.material().is_stratum() {
                    continue;
                }
                let world_x = chunk.world_x(x);

                let distance = f64::from(distances[y][x]) / f64::from(radius + 1);
                let noise = self.cosmetic_noise.sample_unit(
                    world_x as f64 * VARIANT_NOISE_SCALE,
                    world_y as f64 * VARIANT_NOISE_SCALE,
                );
                let jitter = (self.jitter_hash.random(world_x, world_y) - 0.5) * JITTER;

                let blend = DISTANCE_WEIGHT * distance
                    + NOISE_WEIGHT * noise
                    + DEPTH_WEIGHT * depth_bias
                    + jitter;
                let variant = (blend * f64::from(VARIANT_COUNT))
                    .floor()
                    .clamp(0.0, f64::from(VARIANT_COUNT - 1)) as u8;

                chunk.put(x, y, cell.with_variant(variant));
            }
        }
    }

    /// Multi-source 4-connected distance from every chunk cell to the
    /// nearest open cell, capped at `radius + 1`.
    ///
    /// Cells up to `radius` beyond the chunk edge count as sources too,
    /// judged by how their own chunk settles, so distances carry across
    /// chunk borders.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn open_distances(&self, chunk: &Chunk, radius: u32) -> [[u32; CHUNK_SIZE]; CHUNK_SIZE] {
        let pad = radius as usize;
        let side = CHUNK_SIZE + 2 * pad;
        let left = chunk.world_x(0) - i64::from(radius);
        let top = chunk.world_y(0) - i64::from(radius);

        let unreached = radius + 1;
        let mut grid = vec![unreached; side * side];
        let mut queue = VecDeque::new();

        for gy in 0..side {
            for gx in 0..side {
                let inside = (gx.wrapping_sub(pad), gy.wrapping_sub(pad));
                let open = if inside.0 < CHUNK_SIZE && inside.1 < CHUNK_SIZE {
                    !chunk.get(inside.0, inside.1).is_solid()
                } else {
                    self.settles_open(left + gx as i64, top + gy as i64)
                };
                if open {
                    grid[gy * side + gx] = 0;
                    queue.push_back((gx, gy));
                }
            }
        }

        while let Some((x, y)) = queue.pop_front() {
            let next = grid[y * side + x] + 1;
            if next > radius {
                continue;
            }
            let neighbours = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                if nx < side && ny < side && grid[ny * side + nx] > next {
                    grid[ny * side + nx] = next;
                    queue.push_back((nx, ny));
                }
            }
        }

        let mut distances = [[unreached; CHUNK_SIZE]; CHUNK_SIZE];
        for (y, row) in distances.iter_mut().enumerate() {
            let start = (y + pad) * side + pad;
            row.copy_from_slice(&grid[start..start + CHUNK_SIZE]);
        }
        distances
    }
}
