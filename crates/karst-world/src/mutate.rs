use karst_tiles::{Liquid, Tile};

use crate::world::World;

/// Whether a write recomputes the touched light column on the spot or
/// leaves it for a later whole-grid pass (bulk generation, raw loads).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightUpdate {
    Immediate,
    Deferred,
}

/// The six axis neighbors, used for change notification and wake-up.
pub(crate) const NEIGHBORS: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Cells a liquid may claim, relative to its own: straight down and the
/// four laterals. Never diagonal, never upward.
const FLOW_TARGETS: [(i32, i32, i32); 5] = [
    (0, -1, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (0, 0, -1),
    (0, 0, 1),
];

impl World {
    /// Unconditional write. Out of bounds is rejected without mutating
    /// anything; the return value says whether the write landed.
    pub fn set_tile(&mut self, x: i32, y: i32, z: i32, tile: Tile, light: LightUpdate) -> bool {
        if !self.is_in_bounds(x, y, z) {
            return false;
        }
        let i = self.idx(x, y, z);
        self.tiles[i] = tile;
        if light == LightUpdate::Immediate {
            self.calculate_light_depths(x, z, 1, 1);
        }
        true
    }

    /// Write plus transition hooks, without notifying neighbors. Returns
    /// false when out of bounds or when the cell already holds `tile`;
    /// in both cases nothing changes.
    pub fn set_tile_with_no_neighbor_change(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        tile: Tile,
        light: LightUpdate,
    ) -> bool {
        self.apply_tile_change(x, y, z, tile, light, false)
    }

    /// Write plus transition hooks, then schedule all six neighbors so
    /// adjacent liquids can react to the change. Propagation runs through
    /// the queue, never through call-stack recursion.
    pub fn set_tile_with_neighbor_change(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        tile: Tile,
        light: LightUpdate,
    ) -> bool {
        self.apply_tile_change(x, y, z, tile, light, true)
    }

    /// Shared change path. Neighbor notifications enqueue before the
    /// cell's own hooks: a drain then reaches the neighborhood while it
    /// still holds its pre-change state, and the changed cell's wake-up
    /// lands behind it, which is what keeps a flood front moving one
    /// ring per tick.
    fn apply_tile_change(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        tile: Tile,
        light: LightUpdate,
        notify: bool,
    ) -> bool {
        if !self.is_in_bounds(x, y, z) {
            return false;
        }
        let old = self.tiles[self.idx(x, y, z)];
        if old == tile {
            return false;
        }
        self.set_tile(x, y, z, tile, light);
        if notify {
            for (dx, dy, dz) in NEIGHBORS {
                self.update_tile(x + dx, y + dy, z + dz, true);
            }
        }
        if !old.is_air() {
            self.removed_tile(x, y, z, old);
        }
        if !tile.is_air() {
            self.added_tile(x, y, z, tile);
        }
        true
    }

    /// Hook: a non-air tile landed. A flowing liquid front always gets a
    /// future tick.
    fn added_tile(&mut self, x: i32, y: i32, z: i32, tile: Tile) {
        if tile.is_moving_liquid() {
            self.update_tile(x, y, z, true);
        }
    }

    /// Hook: a non-air tile was replaced. Any adjacent liquid is
    /// scheduled so it can claim the opening on a later tick.
    fn removed_tile(&mut self, x: i32, y: i32, z: i32, _old: Tile) {
        for (dx, dy, dz) in NEIGHBORS {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            if self.get_tile(nx, ny, nz).is_liquid() {
                self.update_tile(nx, ny, nz, true);
            }
        }
    }

    /// Re-evaluate one cell's simulation rule, now or on a later tick.
    /// Out-of-bounds coordinates are dropped at the door, which keeps the
    /// queue free of invalid entries.
    pub fn update_tile(&mut self, x: i32, y: i32, z: i32, deferred: bool) {
        if !self.is_in_bounds(x, y, z) {
            return;
        }
        if deferred {
            self.updates.push_back((x, y, z));
        } else {
            self.evaluate_tile(x, y, z);
        }
    }

    /// Sole admission rule for liquid spread: a liquid may claim an
    /// in-bounds air cell. Everything else, including the boundary void,
    /// is inadmissible.
    pub fn can_flood(&self, x: i32, y: i32, z: i32, tile: Tile) -> bool {
        tile.is_liquid() && self.is_in_bounds(x, y, z) && self.get_tile(x, y, z).is_air()
    }

    /// Drain a bounded batch of pending updates in FIFO order. Cells
    /// queued during the drain land behind the batch and run on a later
    /// tick; that is what advances a flood front one cell per tick.
    /// Returns the number of updates processed.
    pub fn tick(&mut self) -> usize {
        let pending = self.updates.len();
        let budget = pending.min(self.params.max_tick_updates);
        let mut processed = 0;
        while processed < budget {
            let Some((x, y, z)) = self.updates.pop_front() else {
                break;
            };
            self.evaluate_tile(x, y, z);
            processed += 1;
        }
        if budget < pending {
            log::debug!("tick budget clipped drain to {} of {} pending", budget, pending);
        }
        processed
    }

    /// Liquid rule for one cell: harden on water contact (lava only),
    /// spread into admissible targets, and keep the flowing/still code
    /// honest. Non-liquid cells have no rule, so stale queue entries
    /// fall out here.
    ///
    /// Spread writes go through the quiet setter: the new cell schedules
    /// itself via `added_tile` and nothing else, so a front advances
    /// exactly one ring per tick instead of cascading through
    /// notification entries drained in the same tick.
    fn evaluate_tile(&mut self, x: i32, y: i32, z: i32) {
        let tile = self.get_tile(x, y, z);
        let Some(family) = tile.liquid() else {
            return;
        };
        match family {
            Liquid::Lava => {
                if self.touches_family(x, y, z, Liquid::Water) {
                    // Water quenches lava where the families meet.
                    self.set_tile_with_neighbor_change(
                        x,
                        y,
                        z,
                        Tile::Stone,
                        LightUpdate::Immediate,
                    );
                    return;
                }
            }
            Liquid::Water => {
                // Water never hardens, but contact must put the lava
                // side on the clock.
                self.wake_adjacent_lava(x, y, z);
            }
        }
        let mut spread = false;
        for (dx, dy, dz) in FLOW_TARGETS {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            if self.can_flood(nx, ny, nz, tile) {
                self.set_tile_with_no_neighbor_change(
                    nx,
                    ny,
                    nz,
                    family.flowing(),
                    LightUpdate::Immediate,
                );
                spread = true;
            }
        }
        if spread {
            if tile.is_moving_liquid() {
                // Active front: keep ticking until it stops spreading.
                self.update_tile(x, y, z, true);
            } else {
                // A woken pool rejoins the front; the write reschedules it.
                self.set_tile_with_no_neighbor_change(
                    x,
                    y,
                    z,
                    family.flowing(),
                    LightUpdate::Immediate,
                );
            }
        } else if tile.is_moving_liquid() {
            // Nothing left to claim: settle until a neighbor change.
            self.set_tile_with_no_neighbor_change(x, y, z, family.still(), LightUpdate::Immediate);
        }
    }

    fn touches_family(&self, x: i32, y: i32, z: i32, family: Liquid) -> bool {
        NEIGHBORS
            .iter()
            .any(|&(dx, dy, dz)| self.get_tile(x + dx, y + dy, z + dz).liquid() == Some(family))
    }

    fn wake_adjacent_lava(&mut self, x: i32, y: i32, z: i32) {
        for (dx, dy, dz) in NEIGHBORS {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            if self.get_tile(nx, ny, nz).is_lava() {
                self.update_tile(nx, ny, nz, true);
            }
        }
    }
}
