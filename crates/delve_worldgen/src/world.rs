//! # World Facade
//!
//! Block-level access over the chunk cache. Gameplay code talks to a
//! [`World`] in world coordinates and never sees chunk boundaries.
//!
//! [`SharedWorld`] wraps a world in a mutex for callers on several threads.
//! The cache itself does not deduplicate concurrent requests; the lock
//! serializes them.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::cache::{CacheStats, ChunkCache};
use crate::cell::{Cell, DigOutcome};
use crate::chunk::{local_offset, ChunkCoord};
use crate::config::WorldConfig;
use crate::error::WorldgenResult;
use crate::seed::WorldSeed;
use crate::terrain::TerrainGenerator;

/// A generated world: one seed, one generator, one cache.
pub struct World {
    cache: ChunkCache,
}

impl World {
    /// Creates a world with the default configuration.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        let config = WorldConfig::default();
        Self {
            cache: ChunkCache::new(TerrainGenerator::new(seed), config.cache),
        }
    }

    /// Creates a world from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either section fails validation.
    pub fn with_config(seed: WorldSeed, config: WorldConfig) -> WorldgenResult<Self> {
        config.validate()?;
        let generator = TerrainGenerator::with_config(seed, config.generator)?;
        tracing::info!(
            seed = seed.value(),
            cache_capacity = config.cache.capacity,
            "world created"
        );
        Ok(Self {
            cache: ChunkCache::new(generator, config.cache),
        })
    }

    /// The cell at world `(x, y)`, generating its chunk if needed.
    pub fn get_block(&mut self, x: i64, y: i64) -> Cell {
        let (lx, ly) = local_offset(x, y);
        self.cache.get_chunk(ChunkCoord::from_world_pos(x, y)).get(lx, ly)
    }

    /// The cell at world `(x, y)` if its chunk is already cached.
    #[must_use]
    pub fn peek_block(&self, x: i64, y: i64) -> Option<Cell> {
        let (lx, ly) = local_offset(x, y);
        self.cache
            .peek(ChunkCoord::from_world_pos(x, y))
            .map(|chunk| chunk.get(lx, ly))
    }

    /// Overwrites the cell at world `(x, y)` and marks its chunk modified.
    pub fn set_block(&mut self, x: i64, y: i64, cell: Cell) {
        let (lx, ly) = local_offset(x, y);
        self.cache
            .get_chunk_mut(ChunkCoord::from_world_pos(x, y))
            .set(lx, ly, cell);
    }

    /// Hits the cell at world `(x, y)` with `damage`.
    ///
    /// Only a diggable cell changes, and only then is its chunk marked
    /// modified.
    pub fn dig(&mut self, x: i64, y: i64, damage: u16) -> DigOutcome {
        let (lx, ly) = local_offset(x, y);
        let chunk = self.cache.get_chunk_mut(ChunkCoord::from_world_pos(x, y));
        let Some(cell) = chunk.get_mut(lx, ly) else {
            return DigOutcome::Undiggable;
        };
        let outcome = cell.apply_damage(damage);
        if outcome != DigOutcome::Undiggable {
            chunk.modified = true;
        }
        outcome
    }

    /// Makes sure every chunk within `radius` chunks of world `(x, y)` is
    /// cached. Returns how many had to be generated.
    ///
    /// The square is clipped to the cache capacity, so preloading can never
    /// evict its own chunks.
    pub fn preload_around(&mut self, x: i64, y: i64, radius: u32) -> usize {
        let center = ChunkCoord::from_world_pos(x, y);
        let radius = i32::try_from(radius).unwrap_or(i32::MAX);
        let mut budget = self.cache.capacity();
        let mut generated = 0;

        'rows: for dy in -radius..=radius {
            for dx in -radius..=radius {
                if budget == 0 {
                    break 'rows;
                }
                let coord = ChunkCoord::new(center.x.saturating_add(dx), center.y.saturating_add(dy));
                if !self.cache.contains(coord) {
                    generated += 1;
                }
                self.cache.get_chunk(coord);
                budget -= 1;
            }
        }

        tracing::debug!(chunk = %center, radius, generated, "preloaded chunks");
        generated
    }

    /// Drops every cached chunk, edits included.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The generator behind this world.
    #[must_use]
    pub fn generator(&self) -> &TerrainGenerator {
        self.cache.generator()
    }

    /// The chunk cache.
    #[must_use]
    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }
}

/// Cloneable, thread-safe handle to a [`World`].
#[derive(Clone)]
pub struct SharedWorld {
    inner: Arc<Mutex<World>>,
}

impl SharedWorld {
    /// Wraps a world.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            inner: Arc::new(Mutex::new(world)),
        }
    }

    /// Locks the world for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.inner.lock()
    }

    /// Runs `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`World::get_block`].
    pub fn get_block(&self, x: i64, y: i64) -> Cell {
        self.inner.lock().get_block(x, y)
    }

    /// See [`World::set_block`].
    pub fn set_block(&self, x: i64, y: i64, cell: Cell) {
        self.inner.lock().set_block(x, y, cell);
    }

    /// See [`World::dig`].
    pub fn dig(&self, x: i64, y: i64, damage: u16) -> DigOutcome {
        self.inner.lock().dig(x, y, damage)
    }
}
