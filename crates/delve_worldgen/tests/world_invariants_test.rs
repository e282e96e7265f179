//! # World Invariant Tests
//!
//! Properties every generated world must hold, checked over wide areas
//! and several seeds.

use delve_worldgen::halo::{in_window, COMPASS};
use delve_worldgen::{
    generate_halo, Cell, ChunkCoord, Material, TerrainGenerator, World, WorldSeed, CHUNK_SIZE,
};

const SEEDS: [u64; 3] = [1, 12345, 0xFEED_FACE];

/// Test: Same seed and coordinate always give the same chunk.
#[test]
fn test_generation_is_deterministic() {
    for seed in SEEDS {
        let a = TerrainGenerator::new(WorldSeed::new(seed));
        let b = TerrainGenerator::new(WorldSeed::new(seed));
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-7, 4), ChunkCoord::new(3, 15)] {
            assert!(a.generate(coord) == b.generate(coord), "seed {seed} chunk {coord}");
        }
    }
}

/// Test: Generation order does not matter.
#[test]
fn test_generation_order_is_irrelevant() {
    let seed = WorldSeed::new(99);
    let coords: Vec<ChunkCoord> = (0..6).map(|i| ChunkCoord::new(i - 3, i)).collect();

    let mut forward = World::new(seed);
    let mut backward = World::new(seed);
    let fwd: Vec<Cell> = coords
        .iter()
        .map(|c| forward.get_block(c.world_x() + 5, c.world_y() + 9))
        .collect();
    let mut bwd: Vec<Cell> = coords
        .iter()
        .rev()
        .map(|c| backward.get_block(c.world_x() + 5, c.world_y() + 9))
        .collect();
    bwd.reverse();
    assert_eq!(fwd, bwd);
}

/// Test: Every column below the safe band has a way through.
#[test]
fn test_every_column_is_escapable() {
    for seed in SEEDS {
        let gen = TerrainGenerator::new(WorldSeed::new(seed));
        let safe_depth = gen.config().safe_depth;

        for cy in 0..22 {
            for cx in -4..4 {
                let chunk = gen.generate(ChunkCoord::new(cx, cy));
                for x in 0..CHUNK_SIZE {
                    let scanned: Vec<Cell> = (0..CHUNK_SIZE)
                        .filter(|&y| chunk.world_y(y) >= safe_depth)
                        .map(|y| chunk.get(x, y))
                        .collect();
                    if scanned.is_empty() {
                        continue;
                    }
                    assert!(
                        scanned.iter().any(|c| !c.is_solid() || c.is_diggable()),
                        "seed {seed} chunk ({cx}, {cy}) column {x} is sealed"
                    );
                }
            }
        }
    }
}

/// Test: Ring frames never border an open void, even across chunk edges.
#[test]
fn test_ring_frames_are_sealed() {
    for seed in SEEDS {
        let mut world = World::new(WorldSeed::new(seed));
        let mut frames = 0;

        for y in 32..(32 * 6) {
            for x in -128..128 {
                if world.get_block(x, y).material() != Material::RingFrame {
                    continue;
                }
                frames += 1;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let neighbour = world.get_block(x + dx, y + dy);
                        assert!(
                            neighbour.is_solid() || neighbour.material() == Material::RingInterior,
                            "seed {seed}: void at ({}, {}) next to frame ({x}, {y})",
                            x + dx,
                            y + dy
                        );
                    }
                }
            }
        }
        assert!(frames > 0, "seed {seed}: no rings in the sampled area");
    }
}

/// Test: Ring interiors stay open after every pass.
#[test]
fn test_ring_interiors_are_open() {
    let mut world = World::new(WorldSeed::new(12345));
    let mut interiors = 0;
    for y in 40..200 {
        for x in -100..100 {
            let cell = world.get_block(x, y);
            if cell.material() == Material::RingInterior {
                interiors += 1;
                assert!(!cell.is_solid());
            }
        }
    }
    assert!(interiors > 0);
}

/// Test: Seed 12345, chunk (0, 0) has sky above a full surface row.
#[test]
fn test_surface_layout_for_known_seed() {
    let gen = TerrainGenerator::new(WorldSeed::new(12345));
    let chunk = gen.generate(ChunkCoord::new(0, 0));

    for x in 0..CHUNK_SIZE {
        for y in 0..=2 {
            assert_eq!(chunk.get(x, y), Cell::EMPTY);
        }
        assert_eq!(chunk.get(x, 3).material(), Material::Surface);
    }
}

/// Test: A negative chunk requested twice is identical and does not crash.
#[test]
fn test_negative_chunk_twice() {
    let gen = TerrainGenerator::new(WorldSeed::new(12345));
    let first = gen.generate(ChunkCoord::new(-5, 10));
    let second = gen.generate(ChunkCoord::new(-5, 10));
    assert!(first == second);
}

/// Test: The magma floor is a hard bottom.
#[test]
fn test_hazard_floor() {
    let mut world = World::new(WorldSeed::new(5));
    let floor = world.generator().config().hazard_depth;
    for x in -50..50 {
        let cell = world.get_block(x, floor);
        assert!(cell.is_hazardous());
        assert!(!cell.is_diggable());
    }
}

/// Test: Halos cover all eight compass windows within their radius bounds.
#[test]
fn test_halo_coverage() {
    for seed in SEEDS {
        for center in [(0, 0), (123, 456), (-999, 77)] {
            let halo = generate_halo(center, 1.0, 3.0, WorldSeed::new(seed));
            for cell in &halo {
                let dx = (cell.x - center.0) as f64;
                let dy = (cell.y - center.1) as f64;
                let d = dx.hypot(dy);
                assert!((1.0..=3.0).contains(&d), "member at distance {d}");
            }
            for direction in COMPASS {
                assert!(
                    halo.iter()
                        .any(|c| in_window((c.x - center.0, c.y - center.1), direction)),
                    "seed {seed}: no member toward {direction:?}"
                );
            }
        }
    }
}

/// Test: Overlays only ever replace diggable rock.
#[test]
fn test_overlays_are_diggable() {
    let gen = TerrainGenerator::new(WorldSeed::new(31337));
    let mut overlays = 0;
    for cy in 0..10 {
        for cx in -3..3 {
            let chunk = gen.generate(ChunkCoord::new(cx, cy));
            for (_, _, cell) in chunk.iter() {
                if matches!(cell.material(), Material::Overlay(_)) {
                    overlays += 1;
                    assert!(cell.is_diggable());
                    assert!(cell.overlay_intensity() > 0);
                }
            }
        }
    }
    assert!(overlays > 0, "heavy rock and containers should leave halos");
}
