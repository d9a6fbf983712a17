use std::collections::VecDeque;

use karst_geom::Vec3;
use karst_tiles::Tile;

use crate::params::SimParams;

/// Standard level dimensions.
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
pub const DEPTH: usize = 128;

/// Tile reported by every read outside the grid. The world edge reads as
/// solid void, so probes at the boundary see rock rather than open air.
pub const BOUNDARY_TILE: Tile = Tile::Bedrock;

/// Bounded voxel world. Owns the tile grid, the per-column light depths,
/// and the FIFO queue of cells awaiting deferred re-evaluation.
pub struct World {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) depth: usize,
    pub(crate) tiles: Vec<Tile>,
    /// Height of the topmost light blocker per column, `z * width + x`.
    pub(crate) light_depths: Vec<i32>,
    /// Queue invariant: every entry is in bounds (checked at enqueue).
    pub(crate) updates: VecDeque<(i32, i32, i32)>,
    pub(crate) params: SimParams,
    water_level: i32,
    ground_level: i32,
    spawn: Vec3,
}

/// Coarse census of the grid, for harness reports and telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub air: usize,
    pub solid: usize,
    pub liquid: usize,
    pub pending_updates: usize,
}

impl World {
    /// Standard-size world, all air, fully lit.
    pub fn new() -> World {
        Self::with_dims(WIDTH, HEIGHT, DEPTH)
    }

    /// Arbitrary-size world for tools and tests; semantics are identical
    /// to the standard size.
    pub fn with_dims(width: usize, height: usize, depth: usize) -> World {
        let params = SimParams::default();
        let water_level = (height as f32 * params.water_level_ratio) as i32;
        let mut w = World {
            width,
            height,
            depth,
            tiles: vec![Tile::Air; width * height * depth],
            light_depths: vec![0; width * depth],
            updates: VecDeque::new(),
            params,
            water_level,
            ground_level: water_level - 2,
            spawn: Vec3::ZERO,
        };
        w.spawn = w.center_fallback_spawn();
        log::debug!("world allocated: {}x{}x{}", width, height, depth);
        w
    }

    /// Swap in new tunables; the derived water and ground levels follow.
    pub fn set_params(&mut self, params: SimParams) {
        self.water_level = (self.height as f32 * params.water_level_ratio) as i32;
        self.ground_level = self.water_level - 2;
        self.params = params;
    }

    #[inline]
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Height of the sea surface.
    #[inline]
    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    /// Nominal terrain height, two tiles under the sea surface.
    #[inline]
    pub fn ground_level(&self) -> i32 {
        self.ground_level
    }

    #[inline]
    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    #[inline]
    pub fn pending_updates(&self) -> usize {
        self.updates.len()
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth
    }

    // Callers prove bounds before indexing.
    #[inline]
    pub(crate) fn idx(&self, x: i32, y: i32, z: i32) -> usize {
        (y as usize * self.depth + z as usize) * self.width + x as usize
    }

    #[inline]
    pub(crate) fn col_idx(&self, x: i32, z: i32) -> usize {
        z as usize * self.width + x as usize
    }

    #[inline]
    pub fn get_tile(&self, x: i32, y: i32, z: i32) -> Tile {
        if self.is_in_bounds(x, y, z) {
            self.tiles[self.idx(x, y, z)]
        } else {
            BOUNDARY_TILE
        }
    }

    #[inline]
    pub fn is_air_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_air()
    }

    #[inline]
    pub fn is_solid_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_solid()
    }

    #[inline]
    pub fn is_liquid_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_liquid()
    }

    #[inline]
    pub fn is_water_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_water()
    }

    #[inline]
    pub fn is_moving_water_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_moving_water()
    }

    #[inline]
    pub fn is_lava_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_lava()
    }

    #[inline]
    pub fn is_moving_lava_tile(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_tile(x, y, z).is_moving_lava()
    }

    /// Tile code the renderer should draw: still liquids animate as
    /// their flowing variant.
    #[inline]
    pub fn get_render_tile(&self, x: i32, y: i32, z: i32) -> Tile {
        self.get_tile(x, y, z).render_tile()
    }

    /// Camera-position query: is this point inside water as drawn.
    pub fn is_render_water_tile(&self, pos: Vec3) -> bool {
        let (x, y, z) = pos.floored();
        self.get_render_tile(x, y, z).is_water()
    }

    /// Camera-position query: is this point inside lava as drawn.
    pub fn is_render_lava_tile(&self, pos: Vec3) -> bool {
        let (x, y, z) = pos.floored();
        self.get_render_tile(x, y, z).is_lava()
    }

    /// Snapshot of the grid as raw byte codes, the canonical level
    /// representation. Flattening order is `(y * depth + z) * width + x`.
    pub fn raw_tiles(&self) -> Vec<u8> {
        self.tiles.iter().map(|t| t.id()).collect()
    }

    /// Whole-grid replacement from raw byte codes. Wrong length or any
    /// unknown code rejects the load with the grid untouched. A
    /// successful load clears the pending queue and recomputes light
    /// depths and the spawn position.
    pub fn load_raw_tiles(&mut self, raw: &[u8]) -> bool {
        if raw.len() != self.tiles.len() {
            log::warn!(
                "rejected raw level: {} bytes, expected {}",
                raw.len(),
                self.tiles.len()
            );
            return false;
        }
        let mut tiles = Vec::with_capacity(raw.len());
        for (i, &code) in raw.iter().enumerate() {
            match Tile::from_id(code) {
                Some(t) => tiles.push(t),
                None => {
                    log::warn!("rejected raw level: unknown tile code {} at {}", code, i);
                    return false;
                }
            }
        }
        self.tiles = tiles;
        self.updates.clear();
        self.calculate_light_depths(0, 0, self.width as i32, self.depth as i32);
        self.calculate_spawn_position();
        log::info!("loaded raw level ({} tiles)", self.tiles.len());
        true
    }

    /// Reinitialize in place: all air, fully lit, empty queue.
    pub fn reset(&mut self) {
        self.tiles.fill(Tile::Air);
        self.light_depths.fill(0);
        self.updates.clear();
        self.spawn = self.center_fallback_spawn();
        log::info!("world reset: {}x{}x{}", self.width, self.height, self.depth);
    }

    /// Highest solid tile in a column, if any. Liquids do not count as a
    /// surface to stand on.
    pub fn top_solid_height(&self, x: i32, z: i32) -> Option<i32> {
        if !self.is_in_bounds(x, 0, z) {
            return None;
        }
        (0..self.height as i32)
            .rev()
            .find(|&y| self.tiles[self.idx(x, y, z)].is_solid())
    }

    /// Pick the spawn column deterministically: the column nearest the
    /// grid center whose surface stands at or above the water level,
    /// ties broken by scan order. Falls back to a point over the center
    /// when no column qualifies.
    pub fn calculate_spawn_position(&mut self) {
        let cx = self.width as i32 / 2;
        let cz = self.depth as i32 / 2;
        let mut best: Option<(i64, i32, i32, i32)> = None;
        for z in 0..self.depth as i32 {
            for x in 0..self.width as i32 {
                let Some(top) = self.top_solid_height(x, z) else {
                    continue;
                };
                if top < self.water_level {
                    continue;
                }
                let dx = (x - cx) as i64;
                let dz = (z - cz) as i64;
                let d2 = dx * dx + dz * dz;
                match best {
                    Some((best_d2, _, _, _)) if best_d2 <= d2 => {}
                    _ => best = Some((d2, x, z, top)),
                }
            }
        }
        match best {
            Some((_, x, z, top)) => {
                self.spawn = Vec3::new(x as f32 + 0.5, top as f32 + 1.0, z as f32 + 0.5);
                log::debug!("spawn column ({}, {}) top {}", x, z, top);
            }
            None => {
                self.spawn = self.center_fallback_spawn();
                log::warn!(
                    "no column surfaces above water level {}; spawn falls back to center",
                    self.water_level
                );
            }
        }
    }

    /// Spawn used when no column qualifies: hovering over the center
    /// column at sea height.
    fn center_fallback_spawn(&self) -> Vec3 {
        let cx = self.width as i32 / 2;
        let cz = self.depth as i32 / 2;
        Vec3::new(
            cx as f32 + 0.5,
            (self.ground_level + 2) as f32,
            cz as f32 + 0.5,
        )
    }

    pub fn stats(&self) -> WorldStats {
        let mut s = WorldStats {
            pending_updates: self.updates.len(),
            ..WorldStats::default()
        };
        for t in &self.tiles {
            if t.is_air() {
                s.air += 1;
            } else if t.is_liquid() {
                s.liquid += 1;
            } else {
                s.solid += 1;
            }
        }
        s
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
