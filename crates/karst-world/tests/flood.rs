use karst_tiles::Tile;
use karst_world::{LightUpdate, World};

fn floored_world(width: usize, height: usize, depth: usize) -> World {
    let mut w = World::with_dims(width, height, depth);
    for z in 0..depth as i32 {
        for x in 0..width as i32 {
            w.set_tile(x, 0, z, Tile::Stone, LightUpdate::Deferred);
        }
    }
    w.calculate_light_depths(0, 0, width as i32, depth as i32);
    w
}

fn settle(w: &mut World, max_ticks: usize) -> bool {
    for _ in 0..max_ticks {
        if w.pending_updates() == 0 {
            return true;
        }
        w.tick();
    }
    w.pending_updates() == 0
}

#[test]
fn flood_front_advances_exactly_one_ring_per_tick() {
    let mut w = floored_world(32, 8, 32);
    let (sx, sz) = (16, 16);
    w.set_tile_with_neighbor_change(sx, 1, sz, Tile::Water, LightUpdate::Immediate);

    for ticks in 1..=5i32 {
        w.tick();
        for z in 0..32 {
            for x in 0..32 {
                let dist = (x - sx).abs() + (z - sz).abs();
                let wet = w.is_water_tile(x, 1, z);
                if dist <= ticks {
                    assert!(wet, "cell ({x},1,{z}) dry after {ticks} ticks");
                } else {
                    assert!(!wet, "cell ({x},1,{z}) wet after only {ticks} ticks");
                }
            }
        }
    }
}

#[test]
fn liquids_spread_down_and_laterally_in_the_same_evaluation() {
    let mut w = World::with_dims(8, 8, 8);
    for z in 0..8 {
        for x in 0..8 {
            w.set_tile(x, 2, z, Tile::Stone, LightUpdate::Deferred);
        }
    }
    // A hole right under where the source will sit.
    w.set_tile(4, 2, 4, Tile::Air, LightUpdate::Deferred);
    w.calculate_light_depths(0, 0, 8, 8);

    w.set_tile_with_neighbor_change(4, 3, 4, Tile::Water, LightUpdate::Immediate);
    w.tick();

    assert!(w.is_water_tile(4, 2, 4), "did not pour into the hole");
    assert!(w.is_water_tile(3, 3, 4));
    assert!(w.is_water_tile(5, 3, 4));
    assert!(w.is_water_tile(4, 3, 3));
    assert!(w.is_water_tile(4, 3, 5));
}

#[test]
fn lava_advances_at_the_same_cadence_as_water() {
    let mut water = floored_world(16, 8, 16);
    let mut lava = floored_world(16, 8, 16);
    water.set_tile_with_neighbor_change(8, 1, 8, Tile::Water, LightUpdate::Immediate);
    lava.set_tile_with_neighbor_change(8, 1, 8, Tile::Lava, LightUpdate::Immediate);

    for _ in 0..4 {
        water.tick();
        lava.tick();
    }
    for z in 0..16 {
        for x in 0..16 {
            assert_eq!(
                water.is_water_tile(x, 1, z),
                lava.is_lava_tile(x, 1, z),
                "families diverged at ({x},1,{z})"
            );
        }
    }
}

#[test]
fn merging_fronts_fill_the_gap_and_quiesce() {
    let mut w = floored_world(24, 8, 24);
    w.set_tile_with_neighbor_change(8, 1, 12, Tile::Water, LightUpdate::Immediate);
    w.set_tile_with_neighbor_change(14, 1, 12, Tile::Water, LightUpdate::Immediate);

    assert!(settle(&mut w, 256), "flood never quiesced");
    // The whole open layer above the floor ends up flooded and calm.
    for z in 0..24 {
        for x in 0..24 {
            assert_eq!(w.get_tile(x, 1, z), Tile::StillWater);
        }
    }
    assert_eq!(w.pending_updates(), 0);
}

#[test]
fn walls_confine_a_flood_to_its_basin() {
    let mut w = floored_world(16, 8, 16);
    // A stone partition splits the layer in two.
    for z in 0..16 {
        for y in 1..4 {
            w.set_tile(8, y, z, Tile::Stone, LightUpdate::Deferred);
        }
    }
    w.calculate_light_depths(0, 0, 16, 16);
    w.set_tile_with_neighbor_change(4, 1, 8, Tile::Water, LightUpdate::Immediate);

    assert!(settle(&mut w, 256), "flood never quiesced");
    for z in 0..16 {
        for x in 0..8 {
            assert!(w.is_water_tile(x, 1, z), "basin cell ({x},1,{z}) dry");
        }
        for x in 9..16 {
            assert!(w.is_air_tile(x, 1, z), "leak past the wall at ({x},1,{z})");
        }
    }
}
