//! # Chunk Cache
//!
//! Bounded memoization of generated chunks.
//!
//! ## Design
//!
//! - Lookup is a `HashMap<ChunkCoord, _>` hit (O(1))
//! - Recency is a logical clock: every access stamps the entry with the next
//!   tick, and a `BTreeMap<tick, coord>` keeps entries ordered oldest first
//! - When full, the oldest entry is evicted before the new chunk goes in, so
//!   the cache never holds more than `capacity` chunks
//!
//! Evicted chunks are dropped, including any gameplay edits. A later request
//! regenerates them from the seed.

use std::collections::{hash_map, BTreeMap, HashMap};

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::CacheConfig;
use crate::terrain::TerrainGenerator;

/// Cache counters since creation (or the last `clear`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests served from the cache.
    pub hits: u64,
    /// Requests that had to generate.
    pub misses: u64,
    /// Entries dropped to make room.
    pub evictions: u64,
}

struct Entry {
    chunk: Chunk,
    last_access: u64,
}

/// LRU cache in front of a [`TerrainGenerator`].
pub struct ChunkCache {
    generator: TerrainGenerator,
    chunks: HashMap<ChunkCoord, Entry>,
    recency: BTreeMap<u64, ChunkCoord>,
    clock: u64,
    capacity: usize,
    stats: CacheStats,
}

impl ChunkCache {
    /// Creates an empty cache. A zero capacity is treated as 1.
    #[must_use]
    pub fn new(generator: TerrainGenerator, config: CacheConfig) -> Self {
        let capacity = config.capacity.max(1);
        Self {
            generator,
            chunks: HashMap::with_capacity(capacity),
            recency: BTreeMap::new(),
            clock: 0,
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Returns the chunk at `coord`, generating it on a miss.
    pub fn get_chunk(&mut self, coord: ChunkCoord) -> &Chunk {
        &self.entry(coord).chunk
    }

    /// Mutable access to the chunk at `coord`, generating it on a miss.
    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> &mut Chunk {
        &mut self.entry(coord).chunk
    }

    /// Looks up a cached chunk without generating or refreshing recency.
    #[must_use]
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord).map(|entry| &entry.chunk)
    }

    /// Returns true if `coord` is cached.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of cached chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Maximum number of cached chunks.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counters.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The generator behind the cache.
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Drops every cached chunk and resets the counters.
    pub fn clear(&mut self) {
        let dropped = self.chunks.len();
        self.chunks.clear();
        self.recency.clear();
        self.stats = CacheStats::default();
        tracing::debug!(dropped, "chunk cache cleared");
    }

    fn entry(&mut self, coord: ChunkCoord) -> &mut Entry {
        self.clock += 1;
        let now = self.clock;

        if self.chunks.len() >= self.capacity && !self.chunks.contains_key(&coord) {
            self.evict_oldest();
        }

        match self.chunks.entry(coord) {
            hash_map::Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                self.recency.remove(&entry.last_access);
                self.recency.insert(now, coord);
                entry.last_access = now;
                self.stats.hits += 1;
                entry
            }
            hash_map::Entry::Vacant(vacant) => {
                let chunk = self.generator.generate(coord);
                self.recency.insert(now, coord);
                self.stats.misses += 1;
                vacant.insert(Entry {
                    chunk,
                    last_access: now,
                })
            }
        }
    }

    fn evict_oldest(&mut self) {
        if let Some((_, victim)) = self.recency.pop_first() {
            self.chunks.remove(&victim);
            self.stats.evictions += 1;
            tracing::debug!(chunk = %victim, "chunk evicted");
        }
    }
}
