//! # Shared World Tests
//!
//! A `SharedWorld` serializes access from several threads.

use std::thread;

use delve_worldgen::{
    Cell, DigOutcome, Material, SharedWorld, Tier, World, WorldConfig, WorldSeed,
};

/// Test: Several threads read the same world and agree.
#[test]
fn test_parallel_readers_agree() {
    let shared = SharedWorld::new(World::new(WorldSeed::new(12345)));
    let expected: Vec<Cell> = (0..64).map(|x| shared.get_block(x, 50)).collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            let world = shared.clone();
            let expected = &expected;
            scope.spawn(move || {
                for (x, cell) in (0..64).zip(expected) {
                    assert_eq!(world.get_block(x, 50), *cell);
                }
            });
        }
    });
}

/// Test: Writes from one thread are visible to the others.
#[test]
fn test_writes_are_visible_across_threads() {
    let shared = SharedWorld::new(World::new(WorldSeed::new(3)));
    let chest = Cell::new(Material::Container(Tier::Clay));

    thread::scope(|scope| {
        for t in 0..4i64 {
            let world = shared.clone();
            scope.spawn(move || world.set_block(t * 100, 30, chest));
        }
    });

    for t in 0..4i64 {
        assert_eq!(shared.get_block(t * 100, 30), chest);
    }
}

/// Test: Concurrent digging on one cell breaks it exactly once.
#[test]
fn test_concurrent_digging_breaks_once() {
    let shared = SharedWorld::new(World::new(WorldSeed::new(3)));
    let hard = Cell::new(Material::Stratum(Tier::Basalt));
    shared.set_block(7, 500, hard);

    let outcomes: Vec<DigOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = (0..hard.hit_points())
            .map(|_| {
                let world = shared.clone();
                scope.spawn(move || world.dig(7, 500, 1))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let broken = outcomes
        .iter()
        .filter(|o| matches!(o, DigOutcome::Broken(_)))
        .count();
    assert_eq!(broken, 1);
    assert_eq!(shared.get_block(7, 500), Cell::EMPTY);
}

/// Test: A world built from TOML honours the file.
#[test]
fn test_world_from_toml_config() {
    let config = WorldConfig::from_toml_str(
        r#"
        [generator]
        surface_row = 6
        safe_depth = 20

        [cache]
        capacity = 8
        "#,
    )
    .unwrap();
    let world = World::with_config(WorldSeed::new(1), config).unwrap();
    let shared = SharedWorld::new(world);

    assert_eq!(shared.get_block(0, 6).material(), Material::Surface);
    assert_eq!(shared.get_block(0, 5), Cell::EMPTY);
    assert_eq!(shared.with(|w| w.cache().capacity()), 8);
}
