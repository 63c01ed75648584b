//! Placement legality and conflict resolution
//!
//! Two terrains may sit next to each other only if they are the same or if
//! the tileset has a transition graphic for them (a [`Boundary`]). When an
//! edit would break that rule, [`conflict_resolve`] decides which of the two
//! terrains stays.

use crate::shape::Boundary;
use crate::terrain::{Corners, Terrain, TerrainKind};

/// Whether two single terrains may share an edge or a corner
pub fn fragments_compatible(t1: Terrain, t2: Terrain) -> bool {
    t1 == t2 || Boundary::between(t1, t2).is_some()
}

/// Whether the four corners form a tile the tileset can draw.
///
/// Only edge-adjacent pairs are checked (TL-TR, BL-BR, TL-BL, TR-BR);
/// diagonal corners never touch.
pub fn compatible(c: &Corners) -> bool {
    fragments_compatible(c.tl, c.tr)
        && fragments_compatible(c.bl, c.br)
        && fragments_compatible(c.tl, c.bl)
        && fragments_compatible(c.tr, c.br)
}

/// Precedence of a plain terrain kind in conflicts.
///
/// Water beats ground, ground beats grass, grass beats trees and rocks.
/// Inside a family the darker variant ranks higher.
pub fn precedence(kind: TerrainKind) -> u8 {
    match kind {
        TerrainKind::None => 0,
        TerrainKind::Trees => 1,
        TerrainKind::Rocks => 2,
        TerrainKind::LightGrass => 3,
        TerrainKind::DarkGrass => 4,
        TerrainKind::LightGround => 5,
        TerrainKind::DarkGround => 6,
        TerrainKind::LightWater => 7,
        TerrainKind::DarkWater => 8,
    }
}

/// Terrain to keep when `imposed` is painted over a conflicting `conflict`.
///
/// Walls always win. Between two walls the imposed one wins.
pub fn conflict_resolve(imposed: Terrain, conflict: Terrain) -> Terrain {
    match (imposed, conflict) {
        (Terrain::Wall(_), _) => imposed,
        (_, Terrain::Wall(_)) => conflict,
        (Terrain::Plain(i), Terrain::Plain(c)) => {
            if precedence(i) >= precedence(c) {
                imposed
            } else {
                conflict
            }
        }
    }
}
