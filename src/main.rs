use std::path::PathBuf;

use clap::Parser;
use karst_geom::Vec3;
use karst_tiles::Tile;
use karst_world::{LightUpdate, World, load_params_from_path};

/// Headless soak harness: builds a flat test level through the bulk
/// mutation interface, pours liquid, ticks the world, and reports.
#[derive(Parser, Debug)]
#[command(name = "karst", version, about = "Headless voxel world soak harness")]
struct Args {
    /// Simulation ticks to run
    #[arg(long, default_value_t = 64)]
    ticks: u32,

    /// Floor height of the flat test level
    #[arg(long, default_value_t = 34)]
    floor: i32,

    /// Pour lava instead of water
    #[arg(long)]
    lava: bool,

    /// Liquid sources as x,y,z (repeatable; default: one at the center)
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_coord)]
    source: Vec<(i32, i32, i32)>,

    /// TOML file with simulation parameters
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,
}

fn parse_coord(s: &str) -> Result<(i32, i32, i32), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got {s:?}"));
    }
    let parse = |p: &str, axis: &str| {
        p.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad {axis} coordinate {p:?}: {e}"))
    };
    Ok((
        parse(parts[0], "x")?,
        parse(parts[1], "y")?,
        parse(parts[2], "z")?,
    ))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut world = World::new();
    if let Some(path) = &args.params {
        match load_params_from_path(path) {
            Ok(p) => {
                log::info!("params loaded from {}", path.display());
                world.set_params(p);
            }
            Err(e) => {
                log::error!("failed to load params from {}: {}", path.display(), e);
                std::process::exit(2);
            }
        }
    }

    build_flat_level(&mut world, args.floor);

    let liquid = if args.lava { Tile::Lava } else { Tile::Water };
    let mut sources = args.source;
    if sources.is_empty() {
        sources.push((
            world.width() as i32 / 2,
            args.floor.clamp(1, world.height() as i32 - 1),
            world.depth() as i32 / 2,
        ));
    }
    for &(x, y, z) in &sources {
        if world.set_tile_with_neighbor_change(x, y, z, liquid, LightUpdate::Immediate) {
            log::info!("{:?} source placed at ({}, {}, {})", liquid, x, y, z);
        } else {
            log::warn!("source at ({}, {}, {}) rejected", x, y, z);
        }
    }

    for tick in 1..=args.ticks {
        let processed = world.tick();
        if tick % 8 == 0 {
            let stats = world.stats();
            log::info!(
                "tick {:>4}: processed {:>5}, liquid {:>6}, pending {:>6}",
                tick,
                processed,
                stats.liquid,
                stats.pending_updates
            );
        }
        if world.pending_updates() == 0 {
            log::info!("simulation quiesced after {} ticks", tick);
            break;
        }
    }

    report(&world, &sources);
}

fn build_flat_level(world: &mut World, floor: i32) {
    let (w, h, d) = (
        world.width() as i32,
        world.height() as i32,
        world.depth() as i32,
    );
    let floor = floor.clamp(1, h - 1);
    for y in 0..floor {
        for z in 0..d {
            for x in 0..w {
                let tile = if y == 0 {
                    Tile::Bedrock
                } else if y < floor - 2 {
                    Tile::Stone
                } else if y < floor - 1 {
                    Tile::Dirt
                } else {
                    Tile::Grass
                };
                world.set_tile(x, y, z, tile, LightUpdate::Deferred);
            }
        }
    }
    // One full pass instead of a column recompute per bulk write.
    world.calculate_light_depths(0, 0, w, d);
    world.calculate_spawn_position();
    log::info!(
        "flat level built: floor height {}, water level {}, spawn {:?}",
        floor,
        world.water_level(),
        world.spawn()
    );
}

fn report(world: &World, sources: &[(i32, i32, i32)]) {
    let stats = world.stats();
    log::info!(
        "final census: air {}, solid {}, liquid {}, pending {}",
        stats.air,
        stats.solid,
        stats.liquid,
        stats.pending_updates
    );

    let spawn = world.spawn();
    let probe_top = Vec3::new(spawn.x, world.height() as f32 + 2.0, spawn.z);
    let probe_bottom = Vec3::new(spawn.x, -2.0, spawn.z);
    match world.clip(probe_top, probe_bottom, None) {
        Some(hit) => log::info!(
            "downward probe over spawn: {:?} at ({}, {}, {}), face {:?}, y {:.2}",
            world.get_tile(hit.x, hit.y, hit.z),
            hit.x,
            hit.y,
            hit.z,
            hit.face,
            hit.pos.y
        ),
        None => log::warn!("downward probe over spawn found no surface"),
    }

    let (sx, sy, sz) = spawn.floored();
    log::info!(
        "spawn column surface brightness: {:.2}",
        world.get_tile_brightness(sx, sy - 1, sz)
    );

    if let Some(&(x, y, z)) = sources.first() {
        let pool = karst_geom::Aabb::new(
            Vec3::new(x as f32 - 4.0, y as f32 - 1.0, z as f32 - 4.0),
            Vec3::new(x as f32 + 5.0, y as f32 + 2.0, z as f32 + 5.0),
        );
        log::info!(
            "around first source: liquid present {}, solid boxes {}",
            world.contains_any_liquid(&pool),
            world.get_tile_aabb_count(&pool)
        );
    }
}
