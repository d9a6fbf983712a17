use crate::world::World;

impl World {
    /// Recompute the stored light depth for every column in the region
    /// `[x, x+span_x) x [z, z+span_z)`, clamped to the grid. A column's
    /// depth is the height of its topmost light-blocking tile, 0 when
    /// nothing in the column blocks. Empty or fully out-of-range regions
    /// are inert.
    pub fn calculate_light_depths(&mut self, x: i32, z: i32, span_x: i32, span_z: i32) {
        let x0 = x.max(0);
        let z0 = z.max(0);
        let x1 = x.saturating_add(span_x).min(self.width as i32);
        let z1 = z.saturating_add(span_z).min(self.depth as i32);
        for cz in z0..z1 {
            for cx in x0..x1 {
                let depth = self.column_light_depth(cx, cz);
                let col = self.col_idx(cx, cz);
                self.light_depths[col] = depth;
            }
        }
    }

    /// Scan down from the sky until something blocks the light.
    fn column_light_depth(&self, x: i32, z: i32) -> i32 {
        for y in (0..self.height as i32).rev() {
            if self.tiles[self.idx(x, y, z)].blocks_light() {
                return y;
            }
        }
        0
    }

    /// A tile is lit when nothing light-blocking stands above it. Outside
    /// the grid the sky is unobstructed.
    #[inline]
    pub fn is_tile_lit(&self, x: i32, y: i32, z: i32) -> bool {
        if !self.is_in_bounds(x, y, z) {
            return true;
        }
        y >= self.light_depths[self.col_idx(x, z)]
    }

    /// Stored depth for one column; out of range reads as fully lit.
    #[inline]
    pub fn light_depth(&self, x: i32, z: i32) -> i32 {
        if x < 0 || z < 0 || x as usize >= self.width || z as usize >= self.depth {
            return 0;
        }
        self.light_depths[self.col_idx(x, z)]
    }

    /// Display brightness for a tile. Liquid cells always render in
    /// shadow, whatever the column depth says.
    pub fn get_tile_brightness(&self, x: i32, y: i32, z: i32) -> f32 {
        if self.get_tile(x, y, z).is_liquid() {
            return self.params.shadow_brightness;
        }
        if self.is_tile_lit(x, y, z) {
            self.params.lit_brightness
        } else {
            self.params.shadow_brightness
        }
    }
}
