//! # DELVE World Generation
//!
//! Deterministic world synthesis for a 2D digging game.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in 32x32 chunks, in any order
//! 3. **Stateless**: Every decision hashes `(seed, coordinates)`; no RNG stream
//! 4. **Playable**: Repair passes guarantee every column can be dug out and
//!    every structural ring is sealed
//!
//! ## Core Components
//!
//! - `SimplexNoise` / `LatticeHash`: seeded noise primitives
//! - `TerrainGenerator`: strata, caverns, rings, repair passes, containers
//! - `HaloGenerator`: organic overlay clusters around points of interest
//! - `ChunkCache`: bounded LRU memoization of chunks
//! - `World` / `SharedWorld`: block-level access in world coordinates
//!
//! ## Example
//!
//! ```rust
//! use delve_worldgen::{Material, World, WorldSeed};
//!
//! let mut world = World::new(WorldSeed::new(12345));
//!
//! // Row 3 is the walkable surface, everything above it is sky.
//! assert_eq!(world.get_block(0, 3).material(), Material::Surface);
//! assert!(!world.get_block(0, 0).is_solid());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod cell;
pub mod chunk;
pub mod config;
pub mod error;
pub mod halo;
pub mod noise;
pub mod seed;
pub mod terrain;
pub mod world;

pub use cache::{CacheStats, ChunkCache};
pub use cell::{Capabilities, Cell, DigOutcome, Material, Tier, VARIANT_COUNT};
pub use chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
pub use config::{CacheConfig, GeneratorConfig, HaloRadii, RingConfig, WorldConfig};
pub use error::{WorldgenError, WorldgenResult};
pub use halo::{generate_halo, HaloCell, HaloGenerator};
pub use noise::{LatticeHash, SimplexNoise};
pub use seed::WorldSeed;
pub use terrain::{RingLayout, RingPart, TerrainGenerator};
pub use world::{SharedWorld, World};
