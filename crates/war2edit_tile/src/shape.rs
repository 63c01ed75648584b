//! Tile shapes and packed tile codes
//!
//! A [`TileCode`] is the 16-bit key a renderer uses to fetch a tile graphic:
//!
//! ```text
//!  15   12 11    8 7     4 3     0
//! +-------+-------+-------+-------+
//! |variant| class | index | mask  |
//! +-------+-------+-------+-------+
//! ```
//!
//! The low 12 bits are the [`Shape`]; the top nibble picks one of the
//! visually equivalent variants of that shape.

use serde::{Deserialize, Serialize};

use crate::terrain::{Corner, Corners, Terrain, TerrainKind, Wall};

const CLASS_SOLID: u16 = 0x1;
const CLASS_BOUNDARY: u16 = 0x2;
const CLASS_WALL: u16 = 0x3;

const SHAPE_BITS: u16 = 12;
const SHAPE_MASK: u16 = (1 << SHAPE_BITS) - 1;

/// Number of distinct variants a tile code can address
pub const VARIANT_LIMIT: u8 = 16;

/// Legal transitions between two terrains, as (upper, lower) pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Boundary {
    /// Dark water over light water
    DeepWater,
    /// Light water over light ground
    Coast,
    /// Dark ground over light ground
    Dirt,
    /// Rocks over light ground
    Rocks,
    /// Light ground over light grass
    Ground,
    /// Dark grass over light grass
    Grass,
    /// Trees over light grass
    Forest,
}

impl Boundary {
    pub const ALL: [Boundary; 7] = [
        Boundary::DeepWater,
        Boundary::Coast,
        Boundary::Dirt,
        Boundary::Rocks,
        Boundary::Ground,
        Boundary::Grass,
        Boundary::Forest,
    ];

    pub fn index(self) -> usize {
        match self {
            Boundary::DeepWater => 0,
            Boundary::Coast => 1,
            Boundary::Dirt => 2,
            Boundary::Rocks => 3,
            Boundary::Ground => 4,
            Boundary::Grass => 5,
            Boundary::Forest => 6,
        }
    }

    /// Terrain drawn on the corners set in a [`CornerMask`]
    pub fn upper(self) -> TerrainKind {
        match self {
            Boundary::DeepWater => TerrainKind::DarkWater,
            Boundary::Coast => TerrainKind::LightWater,
            Boundary::Dirt => TerrainKind::DarkGround,
            Boundary::Rocks => TerrainKind::Rocks,
            Boundary::Ground => TerrainKind::LightGround,
            Boundary::Grass => TerrainKind::DarkGrass,
            Boundary::Forest => TerrainKind::Trees,
        }
    }

    /// Terrain drawn on the corners clear in a [`CornerMask`]
    pub fn lower(self) -> TerrainKind {
        match self {
            Boundary::DeepWater => TerrainKind::LightWater,
            Boundary::Coast | Boundary::Dirt | Boundary::Rocks => TerrainKind::LightGround,
            Boundary::Ground | Boundary::Grass | Boundary::Forest => TerrainKind::LightGrass,
        }
    }

    /// The boundary joining two terrains, in either order
    pub fn between(a: Terrain, b: Terrain) -> Option<Boundary> {
        let (a, b) = (a.kind()?, b.kind()?);
        Self::ALL.into_iter().find(|boundary| {
            let (u, l) = (boundary.upper(), boundary.lower());
            (a == u && b == l) || (a == l && b == u)
        })
    }
}

/// Set of corners holding the upper terrain of a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CornerMask(u8);

impl CornerMask {
    pub const TL: u8 = 0b1000;
    pub const TR: u8 = 0b0100;
    pub const BL: u8 = 0b0010;
    pub const BR: u8 = 0b0001;

    pub const EMPTY: CornerMask = CornerMask(0);
    pub const FULL: CornerMask = CornerMask(0b1111);

    pub fn new(bits: u8) -> Self {
        debug_assert!(bits <= 0b1111, "corner mask out of range: {bits:#x}");
        Self(bits & 0b1111)
    }

    pub fn bit(corner: Corner) -> u8 {
        match corner {
            Corner::TopLeft => Self::TL,
            Corner::TopRight => Self::TR,
            Corner::BottomLeft => Self::BL,
            Corner::BottomRight => Self::BR,
        }
    }

    /// Mask of the corners equal to `terrain`
    pub fn of(corners: &Corners, terrain: Terrain) -> Self {
        let bits = Corner::ALL
            .into_iter()
            .filter(|&corner| corners.get(corner) == terrain)
            .fold(0, |acc, corner| acc | Self::bit(corner));
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, corner: Corner) -> bool {
        self.0 & Self::bit(corner) != 0
    }

    /// A boundary mask must mix both terrains
    pub fn is_partial(self) -> bool {
        self != Self::EMPTY && self != Self::FULL
    }
}

/// Discrete visual pattern of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// One terrain on all four corners
    Solid(TerrainKind),
    /// Two terrains; the mask marks the corners with `boundary.upper()`
    Boundary(Boundary, CornerMask),
    /// A full wall block
    Wall(Wall),
}

/// Shape family, used to look up variant counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeClass {
    Solid,
    Boundary,
    Wall,
}

impl ShapeClass {
    pub fn index(self) -> usize {
        match self {
            ShapeClass::Solid => 0,
            ShapeClass::Boundary => 1,
            ShapeClass::Wall => 2,
        }
    }
}

impl Shape {
    pub fn class(&self) -> ShapeClass {
        match self {
            Shape::Solid(_) => ShapeClass::Solid,
            Shape::Boundary(..) => ShapeClass::Boundary,
            Shape::Wall(_) => ShapeClass::Wall,
        }
    }

    /// Canonical corners drawn by this shape
    pub fn corners(&self) -> Corners {
        match *self {
            Shape::Solid(kind) => Corners::uniform(Terrain::Plain(kind)),
            Shape::Wall(wall) => Corners::uniform(Terrain::Wall(wall)),
            Shape::Boundary(boundary, mask) => {
                let upper = Terrain::Plain(boundary.upper());
                let lower = Terrain::Plain(boundary.lower());
                let pick = |corner| if mask.contains(corner) { upper } else { lower };
                Corners::new(
                    pick(Corner::TopLeft),
                    pick(Corner::TopRight),
                    pick(Corner::BottomLeft),
                    pick(Corner::BottomRight),
                )
            }
        }
    }

    /// Pack into the low 12 bits of a tile code
    pub fn bits(&self) -> u16 {
        match *self {
            Shape::Solid(kind) => (CLASS_SOLID << 8) | ((kind.code() as u16) << 4),
            Shape::Boundary(boundary, mask) => {
                debug_assert!(mask.is_partial(), "boundary with uniform mask");
                (CLASS_BOUNDARY << 8) | ((boundary.index() as u16) << 4) | mask.bits() as u16
            }
            Shape::Wall(wall) => (CLASS_WALL << 8) | ((wall.index() as u16) << 4),
        }
    }

    /// Unpack from the low 12 bits of a tile code
    pub fn from_bits(bits: u16) -> Option<Self> {
        let class = (bits >> 8) & 0xf;
        let index = ((bits >> 4) & 0xf) as usize;
        let mask = (bits & 0xf) as u8;

        match class {
            CLASS_SOLID if mask == 0 => TerrainKind::from_code(index as u8).map(Shape::Solid),
            CLASS_BOUNDARY => {
                let mask = CornerMask::new(mask);
                if !mask.is_partial() {
                    return None;
                }
                Boundary::ALL
                    .get(index)
                    .map(|&boundary| Shape::Boundary(boundary, mask))
            }
            CLASS_WALL if mask == 0 => Wall::ALL.get(index).copied().map(Shape::Wall),
            _ => None,
        }
    }
}

/// Packed (shape, variant) key of a renderable tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(pub u16);

impl TileCode {
    pub fn new(shape: Shape, variant: u8) -> Self {
        debug_assert!(variant < VARIANT_LIMIT, "variant out of range: {variant}");
        let variant = (variant % VARIANT_LIMIT) as u16;
        TileCode((variant << SHAPE_BITS) | shape.bits())
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    /// `None` for codes no shape encodes to
    pub fn shape(self) -> Option<Shape> {
        Shape::from_bits(self.0 & SHAPE_MASK)
    }

    pub fn variant(self) -> u8 {
        (self.0 >> SHAPE_BITS) as u8
    }

    /// Same shape, variant zero
    pub fn base(self) -> TileCode {
        TileCode(self.0 & SHAPE_MASK)
    }
}

impl std::fmt::Display for TileCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}
