//! Spreading a terrain edit to neighboring tiles
//!
//! Painting a tile sets its four corners. Each of the eight surrounding
//! tiles shares one corner (diagonal neighbors) or two corners (edge
//! neighbors) with it, so those tiles must be redrawn too. A
//! [`Propagation`] describes that update for one neighbor.

use serde::{Deserialize, Serialize};

use crate::compat::{conflict_resolve, fragments_compatible};
use crate::terrain::{Corner, Corners, Terrain};

/// Direction of a neighbor relative to the painted tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Propagate(u8);

impl Propagate {
    pub const NONE: Propagate = Propagate(0);
    /// The painted tile itself
    pub const FULL: Propagate = Propagate(0xf);

    pub const T: Propagate = Propagate(1 << 0);
    pub const B: Propagate = Propagate(1 << 1);
    pub const L: Propagate = Propagate(1 << 2);
    pub const R: Propagate = Propagate(1 << 3);

    pub const TL: Propagate = Propagate(Self::T.0 | Self::L.0);
    pub const TR: Propagate = Propagate(Self::T.0 | Self::R.0);
    pub const BL: Propagate = Propagate(Self::B.0 | Self::L.0);
    pub const BR: Propagate = Propagate(Self::B.0 | Self::R.0);

    /// The eight neighbors, row by row
    pub const AROUND: [Propagate; 8] = [
        Self::TL,
        Self::T,
        Self::TR,
        Self::L,
        Self::R,
        Self::BL,
        Self::B,
        Self::BR,
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Propagate) -> bool {
        self.0 & other.0 == other.0
    }

    /// Grid offset from the painted tile to this neighbor
    pub fn offset(self) -> (i32, i32) {
        if self == Self::FULL {
            return (0, 0);
        }
        let dx = match (self.contains(Self::L), self.contains(Self::R)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        let dy = match (self.contains(Self::T), self.contains(Self::B)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        };
        (dx, dy)
    }

    /// Corners of the neighbor that coincide with the painted tile's corners
    pub fn shared_corners(self) -> Vec<Corner> {
        if self == Self::FULL {
            return Corner::ALL.to_vec();
        }
        let (dx, dy) = self.offset();
        Corner::ALL
            .into_iter()
            .filter(|corner| {
                // a neighbor above shares its bottom row, one to the left its right column
                let (left, top) = match corner {
                    Corner::TopLeft => (true, true),
                    Corner::TopRight => (false, true),
                    Corner::BottomLeft => (true, false),
                    Corner::BottomRight => (false, false),
                };
                let x_ok = match dx {
                    -1 => !left,
                    1 => left,
                    _ => true,
                };
                let y_ok = match dy {
                    -1 => !top,
                    1 => top,
                    _ => true,
                };
                x_ok && y_ok
            })
            .collect()
    }
}

/// How one tile must change after an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Propagation {
    pub x: u32,
    pub y: u32,
    pub prop: Propagate,
    /// New corners of the tile
    pub corners: Corners,
    /// False when an existing terrain outranked the edit; the tile must be left as is
    pub valid: bool,
    /// True when a corner of the tile had to be overwritten to stay drawable
    pub conflict: bool,
}

impl Propagation {
    /// Impose `imposed` on the corners of the tile at `(x, y)` that it
    /// shares with the painted tile, given the tile's `existing` corners.
    ///
    /// Remaining corners that cannot border `imposed` are settled with
    /// [`conflict_resolve`]: if the edit wins they are overwritten too, if
    /// the existing terrain wins the propagation is marked invalid.
    pub fn compute(
        x: u32,
        y: u32,
        prop: Propagate,
        existing: Corners,
        imposed: Terrain,
    ) -> Propagation {
        let shared = prop.shared_corners();
        let mut corners = existing;
        let mut valid = true;
        let mut conflict = false;

        for corner in Corner::ALL {
            if shared.contains(&corner) {
                corners.set(corner, imposed);
                continue;
            }
            let current = existing.get(corner);
            if fragments_compatible(imposed, current) {
                continue;
            }
            if conflict_resolve(imposed, current) == imposed {
                corners.set(corner, imposed);
                conflict = true;
            } else {
                valid = false;
            }
        }

        Propagation {
            x,
            y,
            prop,
            corners: if valid { corners } else { existing },
            valid,
            conflict,
        }
    }
}
