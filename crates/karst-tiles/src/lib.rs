//! Closed tile-type set and the pure classification predicates over it.
#![forbid(unsafe_code)]

/// Tile kinds, stored in the grid as their byte code. The codes are part
/// of the raw level representation and must stay stable; gaps are codes
/// this set does not carry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Tile {
    Air = 0,
    Stone = 1,
    Grass = 2,
    Dirt = 3,
    Cobblestone = 4,
    Planks = 5,
    Bedrock = 7,
    Water = 8,
    StillWater = 9,
    Lava = 10,
    StillLava = 11,
    Sand = 12,
    Gravel = 13,
    Leaves = 18,
    Glass = 20,
}

/// Liquid family. Each family has a flowing code (an active front the
/// simulation keeps ticking) and a still code (a calm cell that only
/// wakes on a neighbor change).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Liquid {
    Water,
    Lava,
}

impl Liquid {
    #[inline]
    pub const fn flowing(self) -> Tile {
        match self {
            Liquid::Water => Tile::Water,
            Liquid::Lava => Tile::Lava,
        }
    }

    #[inline]
    pub const fn still(self) -> Tile {
        match self {
            Liquid::Water => Tile::StillWater,
            Liquid::Lava => Tile::StillLava,
        }
    }
}

impl Tile {
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Decode a byte code; codes outside the closed set are rejected.
    pub const fn from_id(id: u8) -> Option<Tile> {
        Some(match id {
            0 => Tile::Air,
            1 => Tile::Stone,
            2 => Tile::Grass,
            3 => Tile::Dirt,
            4 => Tile::Cobblestone,
            5 => Tile::Planks,
            7 => Tile::Bedrock,
            8 => Tile::Water,
            9 => Tile::StillWater,
            10 => Tile::Lava,
            11 => Tile::StillLava,
            12 => Tile::Sand,
            13 => Tile::Gravel,
            18 => Tile::Leaves,
            20 => Tile::Glass,
            _ => return None,
        })
    }

    pub const ALL: [Tile; 15] = [
        Tile::Air,
        Tile::Stone,
        Tile::Grass,
        Tile::Dirt,
        Tile::Cobblestone,
        Tile::Planks,
        Tile::Bedrock,
        Tile::Water,
        Tile::StillWater,
        Tile::Lava,
        Tile::StillLava,
        Tile::Sand,
        Tile::Gravel,
        Tile::Leaves,
        Tile::Glass,
    ];

    #[inline]
    pub fn is_air(self) -> bool {
        matches!(self, Tile::Air)
    }

    #[inline]
    pub fn is_water(self) -> bool {
        matches!(self, Tile::Water | Tile::StillWater)
    }

    #[inline]
    pub fn is_moving_water(self) -> bool {
        matches!(self, Tile::Water)
    }

    #[inline]
    pub fn is_lava(self) -> bool {
        matches!(self, Tile::Lava | Tile::StillLava)
    }

    #[inline]
    pub fn is_moving_lava(self) -> bool {
        matches!(self, Tile::Lava)
    }

    #[inline]
    pub fn is_liquid(self) -> bool {
        self.is_water() || self.is_lava()
    }

    /// Flowing liquid codes only; still variants are not moving.
    #[inline]
    pub fn is_moving_liquid(self) -> bool {
        matches!(self, Tile::Water | Tile::Lava)
    }

    /// Occupies its cell for collision: neither air nor a liquid.
    #[inline]
    pub fn is_solid(self) -> bool {
        !self.is_air() && !self.is_liquid()
    }

    /// Whether a column's light stops at this tile. Liquids block light;
    /// glass and leaves let it through.
    #[inline]
    pub fn blocks_light(self) -> bool {
        !matches!(self, Tile::Air | Tile::Glass | Tile::Leaves)
    }

    #[inline]
    pub fn liquid(self) -> Option<Liquid> {
        if self.is_water() {
            Some(Liquid::Water)
        } else if self.is_lava() {
            Some(Liquid::Lava)
        } else {
            None
        }
    }

    /// Code the renderer draws: still liquids animate as their flowing
    /// variant, everything else renders as itself.
    #[inline]
    pub fn render_tile(self) -> Tile {
        match self {
            Tile::StillWater => Tile::Water,
            Tile::StillLava => Tile::Lava,
            t => t,
        }
    }
}
