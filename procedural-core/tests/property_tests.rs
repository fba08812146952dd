//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL seeds and sane parameters:
//! - Border cells are always wall
//! - Every floor cell is reachable from spawn (one region)
//! - Room centers keep the spawn exclusion distance
//! - Same config → identical cave
//! - Tunnels connect their endpoints without touching the border
//! - Tunnels inside one region never add or split regions

use proptest::prelude::*;

use cave_core::generation::connect::carve_tunnel;
use cave_core::generation::grid::distance_sq;
use cave_core::generation::regions::{find_regions, flood_fill};
use cave_core::generation::rng::CaveRng;
use cave_core::generation::smoothing::smooth;
use cave_core::generation::{Cell, Grid};
use cave_core::{generate_cave, CaveConfig};

fn small_config() -> impl Strategy<Value = CaveConfig> {
    (
        any::<u64>(),
        8usize..=40,
        8usize..=40,
        0u32..=100,
        0u32..=6,
        0u32..=6,
        1u32..=4,
    )
        .prop_map(
            |(seed, width, height, fill, smoothing, rooms, radius)| CaveConfig {
                seed,
                width,
                height,
                fill_percentage: fill,
                smoothing_iterations: smoothing,
                room_count: rooms,
                room_radius: radius,
                max_placement_attempts: 30,
                ..CaveConfig::default()
            },
        )
}

// ============================================================
// Full pipeline
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_border_always_wall(config in small_config()) {
        let layout = generate_cave(&config).unwrap();
        prop_assert!(layout.border_intact(), "border broken for {:?}", config);
    }

    #[test]
    fn prop_every_floor_reachable_from_spawn(config in small_config()) {
        let layout = generate_cave(&config).unwrap();
        prop_assert!(layout.grid.is_floor(layout.spawn_center()));
        prop_assert!(layout.unreachable_room_centers().is_empty());
        prop_assert_eq!(find_regions(&layout.grid).len(), 1);
    }

    #[test]
    fn prop_rooms_respect_spawn_exclusion(config in small_config()) {
        let layout = generate_cave(&config).unwrap();
        let exclusion = config.spawn_exclusion_sq();
        for center in layout.spawner_sites() {
            prop_assert!(
                distance_sq(center, layout.spawn_center()) >= exclusion,
                "room {:?} too close to spawn {:?}",
                center,
                layout.spawn_center()
            );
        }
        prop_assert_eq!(
            layout.rooms.len() as u32 + layout.skipped_rooms,
            config.room_count
        );
    }

    #[test]
    fn prop_same_config_same_cave(config in small_config()) {
        let a = generate_cave(&config).unwrap();
        let b = generate_cave(&config).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_default_size_any_seed(seed in any::<u64>()) {
        let layout = generate_cave(&CaveConfig::default().with_seed(seed)).unwrap();
        prop_assert!(layout.is_fully_connected());
        prop_assert!(layout.rooms.len() <= 5);
    }
}

// ============================================================
// Pipeline stages
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_smoothing_keeps_border(seed in any::<u64>(), iterations in 0u32..=8) {
        let mut rng = CaveRng::new(seed);
        let grid = cave_core::generation::fill::random_fill(30, 20, 45, &mut rng);
        let smoothed = smooth(grid, iterations);
        prop_assert!(smoothed.border_intact());
    }

    #[test]
    fn prop_tunnel_joins_endpoints(
        seed in any::<u64>(),
        ax in 1usize..29,
        ay in 1usize..19,
        bx in 1usize..29,
        by in 1usize..19,
    ) {
        let mut grid = Grid::filled(30, 20, Cell::Wall);
        let mut rng = CaveRng::new(seed);
        carve_tunnel(&mut grid, (ax, ay), (bx, by), &mut rng);

        prop_assert!(grid.border_intact());
        prop_assert!(grid.is_floor((ax, ay)));
        prop_assert!(grid.is_floor((bx, by)));
        prop_assert!(flood_fill(&grid, (ax, ay)).contains((bx, by)));
    }

    #[test]
    fn prop_tunnel_within_region_never_splits(
        seed in any::<u64>(),
        region_pick in any::<prop::sample::Index>(),
        a_pick in any::<prop::sample::Index>(),
        b_pick in any::<prop::sample::Index>(),
    ) {
        let mut rng = CaveRng::new(seed);
        let mut grid = smooth(cave_core::generation::fill::random_fill(30, 20, 45, &mut rng), 3);
        let before = find_regions(&grid);
        prop_assume!(!before.is_empty());

        let region = region_pick.get(&before);
        let a = *a_pick.get(&region.cells);
        let b = *b_pick.get(&region.cells);
        carve_tunnel(&mut grid, a, b, &mut rng);

        let after = find_regions(&grid);
        prop_assert!(after.len() <= before.len());
        prop_assert!(flood_fill(&grid, a).contains(b));
        prop_assert!(grid.border_intact());
    }

    #[test]
    fn prop_regions_partition_floor(seed in any::<u64>(), fill in 20u32..=70) {
        let mut rng = CaveRng::new(seed);
        let grid = cave_core::generation::fill::random_fill(25, 25, fill, &mut rng);
        let regions = find_regions(&grid);
        let total: usize = regions.iter().map(|r| r.len()).sum();
        prop_assert_eq!(total, grid.floor_count());
        prop_assert!(regions.iter().all(|r| !r.is_empty()));
    }
}
