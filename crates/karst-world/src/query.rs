use karst_geom::{Aabb, Face, Vec3};
use karst_tiles::Liquid;

use crate::world::World;

/// First solid cell a clip enters, with the struck face and the exact
/// point where the segment crosses it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub face: Face,
    pub pos: Vec3,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

#[inline]
fn tile_box(x: i32, y: i32, z: i32) -> Aabb {
    Aabb::new(
        Vec3::new(x as f32, y as f32, z as f32),
        Vec3::new(x as f32 + 1.0, y as f32 + 1.0, z as f32 + 1.0),
    )
}

impl World {
    /// Integer cell ranges covered by a box, clamped to the grid.
    /// Malformed boxes (inverted or non-finite) cover nothing.
    fn footprint(&self, bounds: &Aabb) -> (i32, i32, i32, i32, i32, i32) {
        let corners = [
            bounds.min.x,
            bounds.min.y,
            bounds.min.z,
            bounds.max.x,
            bounds.max.y,
            bounds.max.z,
        ];
        if corners.iter().any(|v| !v.is_finite()) {
            return (0, 0, 0, 0, 0, 0);
        }
        let x0 = (bounds.min.x.floor() as i32).max(0);
        let y0 = (bounds.min.y.floor() as i32).max(0);
        let z0 = (bounds.min.z.floor() as i32).max(0);
        let x1 = (bounds.max.x.floor() as i32).saturating_add(1).min(self.width as i32);
        let y1 = (bounds.max.y.floor() as i32).saturating_add(1).min(self.height as i32);
        let z1 = (bounds.max.z.floor() as i32).saturating_add(1).min(self.depth as i32);
        (x0, x1, y0, y1, z0, z1)
    }

    fn each_solid_box<F: FnMut(Aabb)>(&self, bounds: &Aabb, mut f: F) {
        let (x0, x1, y0, y1, z0, z1) = self.footprint(bounds);
        for y in y0..y1 {
            for z in z0..z1 {
                for x in x0..x1 {
                    if !self.tiles[self.idx(x, y, z)].is_solid() {
                        continue;
                    }
                    let cube = tile_box(x, y, z);
                    if bounds.overlaps(&cube) {
                        f(cube);
                    }
                }
            }
        }
    }

    /// Unit collision boxes of every solid tile strictly overlapping the
    /// query box. Liquids and air contribute nothing; tiles outside the
    /// grid do not exist.
    pub fn get_tile_aabbs(&self, bounds: &Aabb) -> Vec<Aabb> {
        let mut out = Vec::new();
        self.each_solid_box(bounds, |cube| out.push(cube));
        out
    }

    /// Number of boxes `get_tile_aabbs` would return, without building
    /// the list.
    pub fn get_tile_aabb_count(&self, bounds: &Aabb) -> usize {
        let mut n = 0;
        self.each_solid_box(bounds, |_| n += 1);
        n
    }

    /// Whether any liquid cell falls inside the box footprint.
    pub fn contains_any_liquid(&self, bounds: &Aabb) -> bool {
        let (x0, x1, y0, y1, z0, z1) = self.footprint(bounds);
        for y in y0..y1 {
            for z in z0..z1 {
                for x in x0..x1 {
                    if self.tiles[self.idx(x, y, z)].is_liquid() {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether the named liquid family falls inside the box footprint.
    pub fn contains_liquid(&self, bounds: &Aabb, family: Liquid) -> bool {
        let (x0, x1, y0, y1, z0, z1) = self.footprint(bounds);
        for y in y0..y1 {
            for z in z0..z1 {
                for x in x0..x1 {
                    if self.tiles[self.idx(x, y, z)].liquid() == Some(family) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Parameter window of the segment's overlap with the grid box,
    /// padded one cell outward so the march steps into the entry cell
    /// rather than starting inside it. None when the segment never
    /// reaches the grid.
    fn grid_window(&self, start: Vec3, d: Vec3, len: f32) -> Option<(f32, f32)> {
        let slabs = [
            (start.x, d.x, self.width as f32),
            (start.y, d.y, self.height as f32),
            (start.z, d.z, self.depth as f32),
        ];
        let mut enter = 0.0f32;
        let mut exit = len;
        for (origin, dir, extent) in slabs {
            if dir.abs() < 1e-8 {
                if origin < 0.0 || origin > extent {
                    return None;
                }
                continue;
            }
            let ta = -origin / dir;
            let tb = (extent - origin) / dir;
            let (near, far) = if ta < tb { (ta, tb) } else { (tb, ta) };
            enter = enter.max(near);
            exit = exit.min(far);
            if enter > exit {
                return None;
            }
        }
        Some(((enter - 1.0).max(0.0), (exit + 1.0).min(len)))
    }

    /// March the segment from `start` to `end` and return the first
    /// solid cell it enters. The starting cell itself is never reported;
    /// liquids are never struck. Degenerate segments and segments that
    /// reach `end` first return None. Only the segment's overlap with
    /// the grid box is marched, so endpoints far outside the world cost
    /// nothing extra. `expected` is the caller's guess at the struck
    /// face and only feeds a trace diagnostic; it never changes the
    /// result.
    pub fn clip(&self, start: Vec3, end: Vec3, expected: Option<Face>) -> Option<RayHit> {
        let delta = end - start;
        let len = delta.length();
        if !len.is_finite() || len < 1e-6 {
            return None;
        }
        let d = delta / len;
        let (t0, t1) = self.grid_window(start, d, len)?;
        let p0 = start + d * t0;

        let (mut vx, mut vy, mut vz) = p0.floored();

        let stepx = if d.x > 0.0 {
            1
        } else if d.x < 0.0 {
            -1
        } else {
            0
        };
        let stepy = if d.y > 0.0 {
            1
        } else if d.y < 0.0 {
            -1
        } else {
            0
        };
        let stepz = if d.z > 0.0 {
            1
        } else if d.z < 0.0 {
            -1
        } else {
            0
        };

        let invx = inv_or_max(d.x);
        let invy = inv_or_max(d.y);
        let invz = inv_or_max(d.z);
        let tdx = if stepx == 0 { f32::MAX } else { invx };
        let tdy = if stepy == 0 { f32::MAX } else { invy };
        let tdz = if stepz == 0 { f32::MAX } else { invz };

        let fx = p0.x - p0.x.floor();
        let fy = p0.y - p0.y.floor();
        let fz = p0.z - p0.z.floor();
        let mut tmx = if stepx > 0 {
            (1.0 - fx) * invx
        } else if stepx < 0 {
            fx * invx
        } else {
            f32::MAX
        };
        let mut tmy = if stepy > 0 {
            (1.0 - fy) * invy
        } else if stepy < 0 {
            fy * invy
        } else {
            f32::MAX
        };
        let mut tmz = if stepz > 0 {
            (1.0 - fz) * invz
        } else if stepz < 0 {
            fz * invz
        } else {
            f32::MAX
        };

        // Crossings are timed from the window start; `t0` places them
        // back on the segment. The window spans at most the grid
        // diagonal, so the cap only backstops float edge cases.
        let max_steps = 3 * (self.width + self.height + self.depth) + 3;
        for _ in 0..max_steps {
            // Step through the smallest tMax; the crossed boundary names
            // the face a hit would strike.
            let face;
            let t;
            if tmx < tmy {
                if tmx < tmz {
                    t = t0 + tmx;
                    vx += stepx;
                    tmx += tdx;
                    face = if stepx > 0 { Face::NegX } else { Face::PosX };
                } else {
                    t = t0 + tmz;
                    vz += stepz;
                    tmz += tdz;
                    face = if stepz > 0 { Face::NegZ } else { Face::PosZ };
                }
            } else if tmy < tmz {
                t = t0 + tmy;
                vy += stepy;
                tmy += tdy;
                face = if stepy > 0 { Face::NegY } else { Face::PosY };
            } else {
                t = t0 + tmz;
                vz += stepz;
                tmz += tdz;
                face = if stepz > 0 { Face::NegZ } else { Face::PosZ };
            }
            if t > t1 {
                break;
            }
            if self.is_in_bounds(vx, vy, vz) && self.tiles[self.idx(vx, vy, vz)].is_solid() {
                if let Some(want) = expected {
                    if want != face {
                        log::trace!("clip expected {:?} but struck {:?}", want, face);
                    }
                }
                return Some(RayHit {
                    x: vx,
                    y: vy,
                    z: vz,
                    face,
                    pos: start + d * t,
                });
            }
        }
        None
    }
}
