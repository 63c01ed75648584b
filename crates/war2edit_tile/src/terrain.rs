//! Terrain codes, corners and eras
//!
//! A terrain code is the atomic unit every autotiling decision works on.
//! On disk and in the editor's brushes it is a single byte where the low
//! bits name a terrain kind and two high flags mark a wall as open or
//! closed. In memory it is the tagged [`Terrain`] value, so a corner is
//! either plain terrain or a wall and can never be both.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Raw byte values of terrain codes
pub mod code {
    pub const NONE: u8 = 0;
    pub const TREES: u8 = 1;
    pub const GRASS_LIGHT: u8 = 2;
    pub const GROUND_LIGHT: u8 = 3;
    pub const WATER_LIGHT: u8 = 4;
    pub const WATER_DARK: u8 = 5;
    pub const GRASS_DARK: u8 = 6;
    pub const GROUND_DARK: u8 = 7;
    pub const ROCKS: u8 = 8;
    pub const HUMAN_WALL: u8 = 9;
    pub const ORC_WALL: u8 = 10;

    pub const WALL_OPEN: u8 = 1 << 5;
    pub const WALL_CLOSED: u8 = 1 << 6;
    pub const WALL_MASK: u8 = WALL_OPEN | WALL_CLOSED;

    pub const SPECIAL: u8 = 1 << 7;

    /// Brush-only value, never stored on a corner
    pub const RANDOMIZE: u8 = 0x7f;
}

/// Plain (non-wall) terrain kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainKind {
    None = code::NONE,
    Trees = code::TREES,
    LightGrass = code::GRASS_LIGHT,
    LightGround = code::GROUND_LIGHT,
    LightWater = code::WATER_LIGHT,
    DarkWater = code::WATER_DARK,
    DarkGrass = code::GRASS_DARK,
    DarkGround = code::GROUND_DARK,
    Rocks = code::ROCKS,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 9] = [
        TerrainKind::None,
        TerrainKind::Trees,
        TerrainKind::LightGrass,
        TerrainKind::LightGround,
        TerrainKind::LightWater,
        TerrainKind::DarkWater,
        TerrainKind::DarkGrass,
        TerrainKind::DarkGround,
        TerrainKind::Rocks,
    ];

    /// Kinds a unit can be built on; used for random brushes and map init
    pub const CONSTRUCTIBLE: [TerrainKind; 4] = [
        TerrainKind::LightGrass,
        TerrainKind::DarkGrass,
        TerrainKind::LightGround,
        TerrainKind::DarkGround,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn is_water(self) -> bool {
        matches!(self, TerrainKind::LightWater | TerrainKind::DarkWater)
    }

    pub fn is_grass(self) -> bool {
        matches!(self, TerrainKind::LightGrass | TerrainKind::DarkGrass)
    }

    pub fn is_ground(self) -> bool {
        matches!(self, TerrainKind::LightGround | TerrainKind::DarkGround)
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainKind::None => "none",
            TerrainKind::Trees => "trees",
            TerrainKind::LightGrass => "light_grass",
            TerrainKind::LightGround => "light_ground",
            TerrainKind::LightWater => "light_water",
            TerrainKind::DarkWater => "dark_water",
            TerrainKind::DarkGrass => "dark_grass",
            TerrainKind::DarkGround => "dark_ground",
            TerrainKind::Rocks => "rocks",
        }
    }
}

/// Which faction built a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallRace {
    Human,
    Orc,
}

/// Whether a wall segment is passable (destroyed) or intact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub race: WallRace,
    pub state: WallState,
}

impl Wall {
    pub const ALL: [Wall; 4] = [
        Wall::new(WallRace::Human, WallState::Open),
        Wall::new(WallRace::Human, WallState::Closed),
        Wall::new(WallRace::Orc, WallState::Open),
        Wall::new(WallRace::Orc, WallState::Closed),
    ];

    pub const fn new(race: WallRace, state: WallState) -> Self {
        Self { race, state }
    }

    /// Position of this wall in [`Wall::ALL`]
    pub fn index(self) -> usize {
        let race = match self.race {
            WallRace::Human => 0,
            WallRace::Orc => 2,
        };
        let state = match self.state {
            WallState::Open => 0,
            WallState::Closed => 1,
        };
        race + state
    }

    pub fn code(self) -> u8 {
        let kind = match self.race {
            WallRace::Human => code::HUMAN_WALL,
            WallRace::Orc => code::ORC_WALL,
        };
        let flag = match self.state {
            WallState::Open => code::WALL_OPEN,
            WallState::Closed => code::WALL_CLOSED,
        };
        kind | flag
    }
}

/// A single corner terrain: plain terrain or a wall, never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Plain(TerrainKind),
    Wall(Wall),
}

impl Terrain {
    pub const NONE: Terrain = Terrain::Plain(TerrainKind::None);
    pub const TREES: Terrain = Terrain::Plain(TerrainKind::Trees);
    pub const LIGHT_GRASS: Terrain = Terrain::Plain(TerrainKind::LightGrass);
    pub const DARK_GRASS: Terrain = Terrain::Plain(TerrainKind::DarkGrass);
    pub const LIGHT_GROUND: Terrain = Terrain::Plain(TerrainKind::LightGround);
    pub const DARK_GROUND: Terrain = Terrain::Plain(TerrainKind::DarkGround);
    pub const LIGHT_WATER: Terrain = Terrain::Plain(TerrainKind::LightWater);
    pub const DARK_WATER: Terrain = Terrain::Plain(TerrainKind::DarkWater);
    pub const ROCKS: Terrain = Terrain::Plain(TerrainKind::Rocks);

    /// Every value a corner can hold
    pub fn all() -> impl Iterator<Item = Terrain> {
        TerrainKind::ALL
            .into_iter()
            .map(Terrain::Plain)
            .chain(Wall::ALL.into_iter().map(Terrain::Wall))
    }

    /// Encode into the single-byte terrain code
    pub fn code(self) -> u8 {
        match self {
            Terrain::Plain(kind) => kind.code(),
            Terrain::Wall(wall) => wall.code(),
        }
    }

    /// Decode a terrain code. Unknown bytes, bare wall kinds without a
    /// state flag and flags on non-wall kinds all yield `None`.
    pub fn from_code(value: u8) -> Option<Self> {
        if value & code::SPECIAL != 0 {
            return None;
        }
        let flags = value & code::WALL_MASK;
        let kind = value & !code::WALL_MASK;

        let state = match flags {
            0 => return TerrainKind::from_code(kind).map(Terrain::Plain),
            code::WALL_OPEN => WallState::Open,
            code::WALL_CLOSED => WallState::Closed,
            _ => return None,
        };
        let race = match kind {
            code::HUMAN_WALL => WallRace::Human,
            code::ORC_WALL => WallRace::Orc,
            _ => return None,
        };
        Some(Terrain::Wall(Wall::new(race, state)))
    }

    pub fn kind(self) -> Option<TerrainKind> {
        match self {
            Terrain::Plain(kind) => Some(kind),
            Terrain::Wall(_) => None,
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Terrain::Wall(_))
    }

    pub fn is(self, kind: TerrainKind) -> bool {
        self == Terrain::Plain(kind)
    }

    pub fn is_water(self) -> bool {
        self.kind().is_some_and(TerrainKind::is_water)
    }

    pub fn is_grass(self) -> bool {
        self.kind().is_some_and(TerrainKind::is_grass)
    }

    pub fn is_ground(self) -> bool {
        self.kind().is_some_and(TerrainKind::is_ground)
    }
}

impl From<TerrainKind> for Terrain {
    fn from(kind: TerrainKind) -> Self {
        Terrain::Plain(kind)
    }
}

impl From<Wall> for Terrain {
    fn from(wall: Wall) -> Self {
        Terrain::Wall(wall)
    }
}

/// One of the four corners of a 2x2 neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Fixed ordering used throughout: TL, TR, BL, BR
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }
}

/// Terrain at the four corners of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corners {
    pub tl: Terrain,
    pub tr: Terrain,
    pub bl: Terrain,
    pub br: Terrain,
}

impl Corners {
    pub const fn new(tl: Terrain, tr: Terrain, bl: Terrain, br: Terrain) -> Self {
        Self { tl, tr, bl, br }
    }

    pub const fn uniform(terrain: Terrain) -> Self {
        Self::new(terrain, terrain, terrain, terrain)
    }

    /// Build from raw terrain codes in TL, TR, BL, BR order
    pub fn from_codes(codes: [u8; 4]) -> Option<Self> {
        Some(Self::new(
            Terrain::from_code(codes[0])?,
            Terrain::from_code(codes[1])?,
            Terrain::from_code(codes[2])?,
            Terrain::from_code(codes[3])?,
        ))
    }

    pub fn codes(&self) -> [u8; 4] {
        self.to_array().map(Terrain::code)
    }

    pub fn to_array(&self) -> [Terrain; 4] {
        [self.tl, self.tr, self.bl, self.br]
    }

    pub fn from_array(corners: [Terrain; 4]) -> Self {
        Self::new(corners[0], corners[1], corners[2], corners[3])
    }

    pub fn get(&self, corner: Corner) -> Terrain {
        self.to_array()[corner.index()]
    }

    pub fn set(&mut self, corner: Corner, terrain: Terrain) {
        match corner {
            Corner::TopLeft => self.tl = terrain,
            Corner::TopRight => self.tr = terrain,
            Corner::BottomLeft => self.bl = terrain,
            Corner::BottomRight => self.br = terrain,
        }
    }

    pub fn any(&self, f: impl Fn(Terrain) -> bool) -> bool {
        self.to_array().into_iter().any(f)
    }

    pub fn all(&self, f: impl Fn(Terrain) -> bool) -> bool {
        self.to_array().into_iter().all(f)
    }

    pub fn count(&self, terrain: Terrain) -> usize {
        self.to_array().into_iter().filter(|&t| t == terrain).count()
    }

    /// Swap left and right columns
    pub fn mirror_horizontal(&self) -> Self {
        Self::new(self.tr, self.tl, self.br, self.bl)
    }

    /// Swap top and bottom rows
    pub fn mirror_vertical(&self) -> Self {
        Self::new(self.bl, self.br, self.tl, self.tr)
    }

    /// Quarter turn clockwise
    pub fn rotate_cw(&self) -> Self {
        Self::new(self.bl, self.tl, self.br, self.tr)
    }
}

/// Map palette. Selects textures and names, never classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Era {
    #[default]
    Forest,
    Winter,
    Wasteland,
    Swamp,
}

impl Era {
    pub const ALL: [Era; 4] = [Era::Forest, Era::Winter, Era::Wasteland, Era::Swamp];

    pub fn index(self) -> usize {
        match self {
            Era::Forest => 0,
            Era::Winter => 1,
            Era::Wasteland => 2,
            Era::Swamp => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Era::Forest => "forest",
            Era::Winter => "winter",
            Era::Wasteland => "wasteland",
            Era::Swamp => "swamp",
        }
    }

    /// Swamp ships only with the expansion
    pub fn requires_extension(self) -> bool {
        self == Era::Swamp
    }
}

/// What a terrain brush paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainBrush {
    Terrain(Terrain),
    Randomize,
}

impl TerrainBrush {
    pub fn code(self) -> u8 {
        match self {
            TerrainBrush::Terrain(terrain) => terrain.code(),
            TerrainBrush::Randomize => code::RANDOMIZE,
        }
    }

    pub fn from_code(value: u8) -> Option<Self> {
        if value == code::RANDOMIZE {
            return Some(TerrainBrush::Randomize);
        }
        Terrain::from_code(value).map(TerrainBrush::Terrain)
    }

    /// Concrete terrain to paint; `Randomize` picks a constructible kind
    pub fn resolve(self, rng: &mut impl Rng) -> Terrain {
        match self {
            TerrainBrush::Terrain(terrain) => terrain,
            TerrainBrush::Randomize => {
                let idx = rng.gen_range(0..TerrainKind::CONSTRUCTIBLE.len());
                Terrain::Plain(TerrainKind::CONSTRUCTIBLE[idx])
            }
        }
    }
}

impl From<Terrain> for TerrainBrush {
    fn from(terrain: Terrain) -> Self {
        TerrainBrush::Terrain(terrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_terrain_code_roundtrip() {
        for terrain in Terrain::all() {
            assert_eq!(Terrain::from_code(terrain.code()), Some(terrain));
        }
    }

    #[test]
    fn test_wall_codes_carry_flags() {
        let wall = Wall::new(WallRace::Orc, WallState::Open);
        assert_eq!(wall.code(), code::ORC_WALL | code::WALL_OPEN);
        assert_eq!(
            Terrain::from_code(code::HUMAN_WALL | code::WALL_CLOSED),
            Some(Terrain::Wall(Wall::new(WallRace::Human, WallState::Closed)))
        );
    }

    #[test]
    fn test_malformed_codes_rejected() {
        // bare wall kind without a state flag
        assert_eq!(Terrain::from_code(code::HUMAN_WALL), None);
        // both wall flags at once
        assert_eq!(Terrain::from_code(code::ORC_WALL | code::WALL_MASK), None);
        // wall flag on plain terrain
        assert_eq!(Terrain::from_code(code::GRASS_LIGHT | code::WALL_OPEN), None);
        assert_eq!(Terrain::from_code(11), None);
        assert_eq!(Terrain::from_code(code::SPECIAL | code::TREES), None);
        assert_eq!(Terrain::from_code(code::RANDOMIZE), None);
    }

    #[test]
    fn test_randomize_brush() {
        assert_eq!(
            TerrainBrush::from_code(code::RANDOMIZE),
            Some(TerrainBrush::Randomize)
        );

        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..32 {
            let terrain = TerrainBrush::Randomize.resolve(&mut rng);
            let kind = terrain.kind().unwrap();
            assert!(TerrainKind::CONSTRUCTIBLE.contains(&kind));
        }
    }

    #[test]
    fn test_corner_transforms() {
        let c = Corners::new(
            Terrain::TREES,
            Terrain::ROCKS,
            Terrain::LIGHT_GRASS,
            Terrain::DARK_GRASS,
        );
        assert_eq!(c.mirror_horizontal().mirror_horizontal(), c);
        assert_eq!(c.mirror_vertical().tl, Terrain::LIGHT_GRASS);
        assert_eq!(c.rotate_cw().rotate_cw().rotate_cw().rotate_cw(), c);
        assert_eq!(c.rotate_cw().tr, Terrain::TREES);
        assert_eq!(Corners::from_codes(c.codes()), Some(c));
    }

    #[test]
    fn test_era_serde_lowercase() {
        let json = serde_json::to_string(&Era::Wasteland).unwrap();
        assert_eq!(json, "\"wasteland\"");
        assert!(Era::Swamp.requires_extension());
        assert!(!Era::Winter.requires_extension());
    }
}
