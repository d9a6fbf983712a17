use proptest::prelude::*;

use karst_geom::{Aabb, Vec3};
use karst_tiles::Tile;
use karst_world::{BOUNDARY_TILE, LightUpdate, World};

fn any_tile() -> impl Strategy<Value = Tile> {
    prop::sample::select(Tile::ALL.to_vec())
}

fn any_tile_code() -> impl Strategy<Value = u8> {
    prop::sample::select(Tile::ALL.map(|t| t.id()).to_vec())
}

fn checkerboard_world() -> World {
    let mut w = World::with_dims(8, 8, 8);
    for y in 0..8 {
        for z in 0..8 {
            for x in 0..8 {
                if (x + y + z) % 2 == 0 {
                    w.set_tile(x, y, z, Tile::Stone, LightUpdate::Deferred);
                }
            }
        }
    }
    w.calculate_light_depths(0, 0, 8, 8);
    w
}

proptest! {
    #[test]
    fn set_then_get_round_trips_in_bounds(
        x in 0..8i32,
        y in 0..8i32,
        z in 0..8i32,
        tile in any_tile(),
    ) {
        let mut w = World::with_dims(8, 8, 8);
        prop_assert!(w.set_tile(x, y, z, tile, LightUpdate::Deferred));
        prop_assert_eq!(w.get_tile(x, y, z), tile);
    }

    #[test]
    fn out_of_bounds_access_never_faults_or_mutates(
        x in -64..64i32,
        y in -64..64i32,
        z in -64..64i32,
        tile in any_tile(),
    ) {
        let mut w = World::with_dims(8, 8, 8);
        prop_assume!(!w.is_in_bounds(x, y, z));
        prop_assert_eq!(w.get_tile(x, y, z), BOUNDARY_TILE);
        prop_assert!(!w.is_air_tile(x, y, z));
        prop_assert!(w.is_tile_lit(x, y, z));
        prop_assert!(!w.set_tile(x, y, z, tile, LightUpdate::Immediate));
        prop_assert!(!w.set_tile_with_neighbor_change(x, y, z, tile, LightUpdate::Immediate));
        prop_assert_eq!(w.stats().air, 8 * 8 * 8);
        prop_assert_eq!(w.pending_updates(), 0);
    }

    #[test]
    fn raw_grids_of_valid_codes_round_trip(
        raw in prop::collection::vec(any_tile_code(), 4 * 4 * 4),
    ) {
        let mut w = World::with_dims(4, 4, 4);
        prop_assert!(w.load_raw_tiles(&raw));
        prop_assert_eq!(w.raw_tiles(), raw);
    }

    #[test]
    fn clip_through_empty_space_hits_nothing(
        sx in -20.0f32..20.0, sy in -20.0f32..20.0, sz in -20.0f32..20.0,
        ex in -20.0f32..20.0, ey in -20.0f32..20.0, ez in -20.0f32..20.0,
    ) {
        let w = World::with_dims(8, 8, 8);
        let hit = w.clip(Vec3::new(sx, sy, sz), Vec3::new(ex, ey, ez), None);
        prop_assert!(hit.is_none());
    }

    #[test]
    fn aabb_count_always_matches_enumeration(
        x0 in -2.0f32..10.0, y0 in -2.0f32..10.0, z0 in -2.0f32..10.0,
        dx in 0.0f32..5.0, dy in 0.0f32..5.0, dz in 0.0f32..5.0,
    ) {
        let w = checkerboard_world();
        let bounds = Aabb::new(
            Vec3::new(x0, y0, z0),
            Vec3::new(x0 + dx, y0 + dy, z0 + dz),
        );
        let boxes = w.get_tile_aabbs(&bounds);
        prop_assert_eq!(boxes.len(), w.get_tile_aabb_count(&bounds));
        for b in &boxes {
            prop_assert!(bounds.overlaps(b));
        }
    }

    #[test]
    fn light_depth_matches_a_naive_column_scan(
        columns in prop::collection::vec((0..6i32, 0..6i32, 0..6i32, any_tile()), 0..24),
    ) {
        let mut w = World::with_dims(6, 6, 6);
        for (x, y, z, tile) in columns {
            w.set_tile(x, y, z, tile, LightUpdate::Deferred);
        }
        w.calculate_light_depths(0, 0, 6, 6);
        for z in 0..6 {
            for x in 0..6 {
                let mut expected = 0;
                for y in (0..6).rev() {
                    if w.get_tile(x, y, z).blocks_light() {
                        expected = y;
                        break;
                    }
                }
                prop_assert_eq!(w.light_depth(x, z), expected);
                for y in 0..6 {
                    prop_assert_eq!(w.is_tile_lit(x, y, z), y >= expected);
                }
            }
        }
    }
}
