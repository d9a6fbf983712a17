//! Bounded voxel world: the tile grid, liquid simulation, per-column
//! light depths, and the geometric queries physics needs.
#![forbid(unsafe_code)]

mod lighting;
mod mutate;
mod params;
mod query;
mod world;


pub use mutate::LightUpdate;
pub use params::{SimParams, load_params_from_path, load_params_from_str};
pub use query::RayHit;
pub use world::{BOUNDARY_TILE, DEPTH, HEIGHT, WIDTH, World, WorldStats};
